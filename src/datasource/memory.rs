//! In-process member/team store.
//!
//! Evaluates the same [`SelectQuery`], [`CountQuery`] and [`BulkStatement`] objects the
//! PostgreSQL session renders to SQL, with matching semantics: SQL NULL comparisons, NULLS
//! LAST for ascending order (FIRST for descending), inner-join semantics for related
//! tables in bulk statements. It also records what it executed and how many sessions are
//! open, which is what the repository tests assert on.

use super::{QuerySession, SessionProvider};
use crate::error::{QueryError, QueryResult};
use crate::models::{Member, MemberTeamRow, Team};
use crate::query_builder::{
    Assignment, BulkKind, BulkStatement, Column, ColumnSource, CountQuery, Direction, Join,
    JoinType, OrderBy, PredicateSet, SelectQuery, SqlValue, TableRef,
};
use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use std::cmp::Ordering;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
use std::sync::Arc;

/// What a session ran, as seen by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutedStatement {
    Select { joined: bool, windowed: bool },
    Count { joined: bool },
    Update { joined: bool },
    Delete { joined: bool },
}

#[derive(Debug, Default)]
struct Tables {
    teams: Vec<Team>,
    members: Vec<Member>,
    next_team_id: i64,
    next_member_id: i64,
}

#[derive(Debug, Default)]
struct State {
    tables: RwLock<Tables>,
    executed: Mutex<Vec<ExecutedStatement>>,
    pending_failure: Mutex<Option<String>>,
    sessions_acquired: AtomicUsize,
    sessions_open: AtomicUsize,
}

/// Shared handle to the store; clones see the same tables
#[derive(Debug, Clone, Default)]
pub struct InMemoryDataSource {
    state: Arc<State>,
}

impl InMemoryDataSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_team(&self, name: &str) -> Team {
        let mut tables = self.state.tables.write();
        tables.next_team_id += 1;
        let team = Team {
            team_id: tables.next_team_id,
            name: name.to_string(),
        };
        tables.teams.push(team.clone());
        team
    }

    pub fn insert_member(&self, username: &str, age: i32, team: Option<&Team>) -> Member {
        let mut tables = self.state.tables.write();
        tables.next_member_id += 1;
        let member = Member {
            member_id: tables.next_member_id,
            username: username.to_string(),
            age,
            team_id: team.map(|t| t.team_id),
        };
        tables.members.push(member.clone());
        member
    }

    pub fn members(&self) -> Vec<Member> {
        self.state.tables.read().members.clone()
    }

    pub fn executed(&self) -> Vec<ExecutedStatement> {
        self.state.executed.lock().clone()
    }

    pub fn clear_executed(&self) {
        self.state.executed.lock().clear();
    }

    /// Make the next executed statement fail with a data source error
    pub fn fail_next(&self, message: impl Into<String>) {
        *self.state.pending_failure.lock() = Some(message.into());
    }

    pub fn sessions_acquired(&self) -> usize {
        self.state.sessions_acquired.load(AtomicOrdering::SeqCst)
    }

    pub fn open_sessions(&self) -> usize {
        self.state.sessions_open.load(AtomicOrdering::SeqCst)
    }
}

#[async_trait]
impl SessionProvider for InMemoryDataSource {
    type Session = InMemorySession;

    async fn acquire(&self) -> QueryResult<InMemorySession> {
        self.state.sessions_acquired.fetch_add(1, AtomicOrdering::SeqCst);
        self.state.sessions_open.fetch_add(1, AtomicOrdering::SeqCst);
        Ok(InMemorySession {
            state: Arc::clone(&self.state),
        })
    }
}

/// Session over the shared store; counted as open until dropped
#[derive(Debug)]
pub struct InMemorySession {
    state: Arc<State>,
}

impl Drop for InMemorySession {
    fn drop(&mut self) {
        self.state.sessions_open.fetch_sub(1, AtomicOrdering::SeqCst);
    }
}

impl InMemorySession {
    fn begin(&self, statement: ExecutedStatement) -> QueryResult<()> {
        if let Some(message) = self.state.pending_failure.lock().take() {
            return Err(QueryError::data_source(message));
        }
        self.state.executed.lock().push(statement);
        Ok(())
    }
}

#[async_trait]
impl QuerySession for InMemorySession {
    async fn execute_query(&mut self, query: &SelectQuery) -> QueryResult<Vec<MemberTeamRow>> {
        self.begin(ExecutedStatement::Select {
            joined: !query.joins().is_empty(),
            windowed: query.pagination().is_some(),
        })?;

        let tables = self.state.tables.read();
        let mut records = join_records(&tables, query.from_table(), query.joins())?;
        records.retain(|r| query.predicates().matches(r));
        records.sort_by(|a, b| compare_records(a, b, query.ordering()));

        let rows: Vec<MemberTeamRow> = records
            .iter()
            .map(|r| MemberTeamRow::new(r.member, r.team))
            .collect();

        Ok(match query.pagination() {
            Some(pagination) => pagination.window(&rows).to_vec(),
            None => rows,
        })
    }

    async fn execute_count(&mut self, query: &CountQuery) -> QueryResult<i64> {
        self.begin(ExecutedStatement::Count {
            joined: !query.joins().is_empty(),
        })?;

        let tables = self.state.tables.read();
        let records = join_records(&tables, query.from_table(), query.joins())?;
        let count = records
            .iter()
            .filter(|r| query.predicates().matches(*r))
            .count();
        i64::try_from(count).map_err(|e| QueryError::data_source(e.to_string()))
    }

    async fn execute_statement(&mut self, statement: &BulkStatement) -> QueryResult<u64> {
        let joined = !statement.joins().is_empty();
        self.begin(match statement.kind() {
            BulkKind::Update => ExecutedStatement::Update { joined },
            BulkKind::Delete => ExecutedStatement::Delete { joined },
        })?;

        let mut tables = self.state.tables.write();
        let matched = matching_members(&tables, statement)?;

        match statement.kind() {
            BulkKind::Update => {
                // apply to copies first so a failing assignment leaves the table untouched
                let mut updated = Vec::with_capacity(matched.len());
                for &index in &matched {
                    let mut member = tables.members[index].clone();
                    for assignment in statement.assignments() {
                        apply_assignment(&mut member, assignment)?;
                    }
                    updated.push((index, member));
                }
                for (index, member) in updated {
                    tables.members[index] = member;
                }
            }
            BulkKind::Delete => {
                // matched is ascending, so walk it alongside the table
                let mut doomed = matched.iter().copied().peekable();
                let mut position = 0;
                tables.members.retain(|_| {
                    let delete = doomed.next_if_eq(&position).is_some();
                    position += 1;
                    !delete
                });
            }
        }

        Ok(matched.len() as u64)
    }
}

/// A member with its (optionally) joined team
struct JoinedRecord<'a> {
    member: &'a Member,
    team: Option<&'a Team>,
}

impl ColumnSource for JoinedRecord<'_> {
    fn column_value(&self, column: &Column) -> Option<SqlValue> {
        let value = match *column {
            c if c == Member::ID => SqlValue::from(self.member.member_id),
            c if c == Member::USERNAME => SqlValue::from(self.member.username.as_str()),
            c if c == Member::AGE => SqlValue::from(self.member.age),
            c if c == Member::TEAM_ID => SqlValue::from(self.member.team_id),
            c if c == Team::ID => SqlValue::from(self.team.map(|t| t.team_id)),
            c if c == Team::NAME => SqlValue::from(self.team.map(|t| t.name.as_str())),
            _ => return None,
        };
        Some(value)
    }
}

fn check_tables(from: TableRef, joins: &[Join]) -> QueryResult<()> {
    if from != Member::TABLE {
        return Err(QueryError::data_source(format!(
            "in-memory store has no table '{}'",
            from.to_sql()
        )));
    }
    match joins {
        [] => Ok(()),
        [join] if join.table == Team::TABLE => Ok(()),
        _ => Err(QueryError::data_source(
            "in-memory store only supports a single join to team",
        )),
    }
}

fn find_team<'a>(tables: &'a Tables, member: &'a Member, join: &Join) -> Option<&'a Team> {
    tables.teams.iter().find(|team| {
        join.on.evaluate(&JoinedRecord {
            member,
            team: Some(team),
        })
    })
}

fn join_records<'a>(
    tables: &'a Tables,
    from: TableRef,
    joins: &[Join],
) -> QueryResult<Vec<JoinedRecord<'a>>> {
    check_tables(from, joins)?;
    let join = joins.first();

    Ok(tables
        .members
        .iter()
        .filter_map(|member| {
            let team = join.and_then(|j| find_team(tables, member, j));
            match join {
                Some(j) if j.join_type == JoinType::Inner && team.is_none() => None,
                _ => Some(JoinedRecord { member, team }),
            }
        })
        .collect())
}

/// Indices of the members a bulk statement applies to
fn matching_members(tables: &Tables, statement: &BulkStatement) -> QueryResult<Vec<usize>> {
    check_tables(statement.target(), statement.joins())?;
    let join = statement.joins().first();
    let predicates: &PredicateSet = statement.predicates();

    Ok(tables
        .members
        .iter()
        .enumerate()
        .filter(|(_, member)| {
            let team = join.and_then(|j| find_team(tables, member, j));
            if join.is_some() && team.is_none() {
                return false;
            }
            predicates.matches(&JoinedRecord { member, team })
        })
        .map(|(index, _)| index)
        .collect())
}

fn apply_assignment(member: &mut Member, assignment: &Assignment) -> QueryResult<()> {
    match assignment {
        Assignment::Set { column, value } => match (*column, value) {
            (c, SqlValue::Text(name)) if c == Member::USERNAME => member.username = name.clone(),
            (c, SqlValue::Integer(age)) if c == Member::AGE => member.age = *age,
            (c, SqlValue::BigInt(id)) if c == Member::TEAM_ID => member.team_id = Some(*id),
            (c, SqlValue::Null) if c == Member::TEAM_ID => member.team_id = None,
            _ => return Err(unsupported(assignment)),
        },
        Assignment::Increment { column, by } => match (*column, by) {
            (c, SqlValue::Integer(delta)) if c == Member::AGE => {
                member.age = member
                    .age
                    .checked_add(*delta)
                    .ok_or_else(|| QueryError::data_source("integer out of range"))?;
            }
            _ => return Err(unsupported(assignment)),
        },
    }
    Ok(())
}

fn unsupported(assignment: &Assignment) -> QueryError {
    QueryError::data_source(format!(
        "unsupported assignment to {}",
        assignment.column().qualified()
    ))
}

/// NULLS LAST ascending, NULLS FIRST descending
fn compare_records(a: &JoinedRecord<'_>, b: &JoinedRecord<'_>, ordering: &[OrderBy]) -> Ordering {
    for term in ordering {
        let left = a.column_value(&term.column).unwrap_or(SqlValue::Null);
        let right = b.column_value(&term.column).unwrap_or(SqlValue::Null);

        let ascending = match (left.is_null(), right.is_null()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => left.compare(&right).unwrap_or(Ordering::Equal),
        };
        let ordered = match term.direction {
            Direction::Asc => ascending,
            Direction::Desc => ascending.reverse(),
        };
        if ordered != Ordering::Equal {
            return ordered;
        }
    }
    Ordering::Equal
}
