use crate::config::SearchConfig;
use crate::datasource::{QuerySession, SessionProvider};
use crate::error::{QueryError, QueryResult};
use crate::logging::{log_bulk_operation, log_error, log_search_operation};
use crate::models::{Member, MemberTeamRow, Team};
use crate::query_builder::{Assignment, BulkStatement, Join, SelectQuery, SqlValue};
use crate::search::{
    total_from_window, CountStrategy, MemberSearchCondition, Page, PageRequest, SortOrder,
};
use std::time::Instant;
use tracing::{debug, instrument};

const COMPONENT: &str = "member_repository";

/// Change applied to every member matched by [`MemberRepository::bulk_update`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberAssignment {
    Username(String),
    Age(i32),
    /// `age = age + delta`
    AddAge(i32),
}

impl MemberAssignment {
    fn to_assignment(&self) -> Assignment {
        match self {
            MemberAssignment::Username(username) => Assignment::Set {
                column: Member::USERNAME,
                value: SqlValue::from(username.as_str()),
            },
            MemberAssignment::Age(age) => Assignment::Set {
                column: Member::AGE,
                value: SqlValue::Integer(*age),
            },
            MemberAssignment::AddAge(delta) => Assignment::Increment {
                column: Member::AGE,
                by: SqlValue::Integer(*delta),
            },
        }
    }
}

/// Dynamic member search over any [`SessionProvider`].
///
/// Every call acquires one session, runs all of its statements on it and lets it go on
/// return, whether the call succeeded or not. Page requests and sort properties are
/// checked before a session is acquired.
#[derive(Debug, Clone)]
pub struct MemberRepository<P> {
    provider: P,
    config: SearchConfig,
}

impl<P: SessionProvider> MemberRepository<P> {
    pub fn new(provider: P) -> Self {
        Self::with_config(provider, SearchConfig::default())
    }

    pub fn with_config(provider: P, config: SearchConfig) -> Self {
        Self { provider, config }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// member LEFT JOIN team, filtered by every present condition field
    fn base_query(condition: &MemberSearchCondition) -> SelectQuery {
        SelectQuery::new(Member::TABLE)
            .select(&MemberTeamRow::PROJECTION)
            .left_join(Team::TABLE, Member::TEAM_ID, Team::ID)
            .filter(condition.predicates())
    }

    /// All matching rows ordered by member id
    pub async fn search(
        &self,
        condition: &MemberSearchCondition,
    ) -> QueryResult<Vec<MemberTeamRow>> {
        self.search_with_order(condition, &[]).await
    }

    /// All matching rows in the given order, ties broken by member id
    #[instrument(skip(self), fields(filters = condition.predicates().len()))]
    pub async fn search_with_order(
        &self,
        condition: &MemberSearchCondition,
        ordering: &[SortOrder],
    ) -> QueryResult<Vec<MemberTeamRow>> {
        let ordering = SortOrder::resolve_all(ordering, MemberTeamRow::sort_column)?;
        let query = Self::base_query(condition)
            .order_by(&ordering)
            .tie_break(Member::ID);

        let start = Instant::now();
        let result = async {
            let mut session = self.provider.acquire().await?;
            session.execute_query(&query).await
        }
        .await;

        let rows = result.inspect_err(|e| report("search", e))?;
        log_search_operation(
            "search",
            query.predicates().len(),
            None,
            None,
            rows.len(),
            None,
            Some(elapsed_ms(start)),
        );
        Ok(rows)
    }

    /// One page using the configured count strategy
    pub async fn search_page(
        &self,
        condition: &MemberSearchCondition,
        request: &PageRequest,
    ) -> QueryResult<Page<MemberTeamRow>> {
        self.search_page_with(condition, request, self.config.count_strategy)
            .await
    }

    /// One page, total counted by fetching the whole filtered set
    pub async fn search_page_simple(
        &self,
        condition: &MemberSearchCondition,
        request: &PageRequest,
    ) -> QueryResult<Page<MemberTeamRow>> {
        self.search_page_with(condition, request, CountStrategy::Simple)
            .await
    }

    /// One page, total counted by a separate (and skippable) count query
    pub async fn search_page_complex(
        &self,
        condition: &MemberSearchCondition,
        request: &PageRequest,
    ) -> QueryResult<Page<MemberTeamRow>> {
        self.search_page_with(condition, request, CountStrategy::Complex)
            .await
    }

    /// One page of matching rows plus the total size of the filtered set
    #[instrument(
        skip(self),
        fields(filters = condition.predicates().len(), page = request.page, size = request.size)
    )]
    pub async fn search_page_with(
        &self,
        condition: &MemberSearchCondition,
        request: &PageRequest,
        strategy: CountStrategy,
    ) -> QueryResult<Page<MemberTeamRow>> {
        request.validate(Some(self.config.max_page_size))?;
        let ordering = request.resolve_sort(MemberTeamRow::sort_column)?;
        let pagination = request.pagination()?;
        let offset = pagination.offset.unwrap_or(0);

        let query = Self::base_query(condition)
            .order_by(&ordering)
            .tie_break(Member::ID);

        let start = Instant::now();
        let result = async {
            let mut session = self.provider.acquire().await?;
            match strategy {
                CountStrategy::Simple => {
                    let rows = session.execute_query(&query).await?;
                    let total = i64::try_from(rows.len())
                        .map_err(|e| QueryError::data_source(e.to_string()))?;
                    Ok::<_, QueryError>((pagination.window(&rows).to_vec(), total))
                }
                CountStrategy::Complex => {
                    let content = session
                        .execute_query(&query.clone().paginate(pagination))
                        .await?;
                    let total = match total_from_window(offset, request.size, content.len()) {
                        Some(total) => {
                            debug!(total, "total known from the page window, count query skipped");
                            total
                        }
                        None => session.execute_count(&query.count_query()).await?,
                    };
                    Ok::<_, QueryError>((content, total))
                }
            }
        }
        .await;

        let (content, total) = result.inspect_err(|e| report("search_page", e))?;
        log_search_operation(
            "search_page",
            query.predicates().len(),
            Some(request.page),
            Some(request.size),
            content.len(),
            Some(total),
            Some(elapsed_ms(start)),
        );
        Ok(Page::new(content, request, total))
    }

    /// Number of matching members, without fetching any row
    #[instrument(skip(self), fields(filters = condition.predicates().len()))]
    pub async fn count(&self, condition: &MemberSearchCondition) -> QueryResult<i64> {
        let count_query = Self::base_query(condition).count_query();

        let result = async {
            let mut session = self.provider.acquire().await?;
            session.execute_count(&count_query).await
        }
        .await;

        let total = result.inspect_err(|e| report("count", e))?;
        debug!(total, "counted matching members");
        Ok(total)
    }

    /// Apply `assignment` to every matching member, returning the affected row count
    #[instrument(skip(self), fields(filters = filter.predicates().len()))]
    pub async fn bulk_update(
        &self,
        filter: &MemberSearchCondition,
        assignment: MemberAssignment,
    ) -> QueryResult<u64> {
        let statement = BulkStatement::update(Member::TABLE)
            .assign(assignment.to_assignment())
            .filter(filter.predicates())
            .join_if_referenced(Self::team_join());

        self.execute_bulk("bulk_update", &statement).await
    }

    /// Delete every matching member, returning the affected row count
    #[instrument(skip(self), fields(filters = filter.predicates().len()))]
    pub async fn bulk_delete(&self, filter: &MemberSearchCondition) -> QueryResult<u64> {
        let statement = BulkStatement::delete(Member::TABLE)
            .filter(filter.predicates())
            .join_if_referenced(Self::team_join());

        self.execute_bulk("bulk_delete", &statement).await
    }

    fn team_join() -> Join {
        Join::inner(Team::TABLE, Member::TEAM_ID, Team::ID)
    }

    async fn execute_bulk(&self, operation: &str, statement: &BulkStatement) -> QueryResult<u64> {
        let start = Instant::now();
        let result = async {
            let mut session = self.provider.acquire().await?;
            session.execute_statement(statement).await
        }
        .await;

        let rows_affected = result.inspect_err(|e| report(operation, e))?;
        log_bulk_operation(
            operation,
            Member::TABLE.name,
            statement.predicates().len(),
            rows_affected,
            Some(elapsed_ms(start)),
        );
        Ok(rows_affected)
    }
}

fn report(operation: &str, error: &QueryError) {
    log_error(COMPONENT, operation, &error.to_string(), None);
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datasource::{ExecutedStatement, InMemoryDataSource};
    use crate::query_builder::Direction;

    fn repository() -> (InMemoryDataSource, MemberRepository<InMemoryDataSource>) {
        let source = InMemoryDataSource::new();
        let a = source.insert_team("A");
        let b = source.insert_team("B");
        source.insert_member("alice", 10, Some(&a));
        source.insert_member("bob", 20, Some(&a));
        source.insert_member("carol", 30, Some(&a));
        source.insert_member("dave", 40, Some(&b));
        source.insert_member("erin", 50, None);
        (source.clone(), MemberRepository::new(source))
    }

    fn usernames(rows: &[MemberTeamRow]) -> Vec<&str> {
        rows.iter().map(|r| r.username.as_str()).collect()
    }

    #[test]
    fn test_assignments() {
        assert_eq!(
            MemberAssignment::AddAge(1).to_assignment(),
            Assignment::Increment {
                column: Member::AGE,
                by: SqlValue::Integer(1)
            }
        );
        assert_eq!(
            MemberAssignment::Username("x".into()).to_assignment().column(),
            Member::USERNAME
        );
    }

    #[tokio::test]
    async fn test_search_orders_by_member_id() {
        let (_, repo) = repository();
        let rows = repo.search(&MemberSearchCondition::new()).await.unwrap();
        assert_eq!(usernames(&rows), vec!["alice", "bob", "carol", "dave", "erin"]);
    }

    #[tokio::test]
    async fn test_search_with_order_rejects_unknown_property() {
        let (source, repo) = repository();
        let err = repo
            .search_with_order(&MemberSearchCondition::new(), &[SortOrder::asc("salary")])
            .await
            .unwrap_err();
        assert!(err.is_invalid_page_request());
        assert_eq!(source.sessions_acquired(), 0);
    }

    #[tokio::test]
    async fn test_complex_page_counts_without_join() {
        let (source, repo) = repository();
        let request = PageRequest::of(0, 2).sorted_by("age", Direction::Desc);

        let page = repo
            .search_page_complex(&MemberSearchCondition::new().age_goe(15), &request)
            .await
            .unwrap();
        assert_eq!(usernames(&page.content), vec!["erin", "dave"]);
        assert_eq!(page.total, 4);
        assert_eq!(
            source.executed(),
            vec![
                ExecutedStatement::Select {
                    joined: true,
                    windowed: true
                },
                ExecutedStatement::Count { joined: false },
            ]
        );
        assert_eq!(source.sessions_acquired(), 1);
        assert_eq!(source.open_sessions(), 0);
    }

    #[tokio::test]
    async fn test_simple_page_runs_one_unwindowed_query() {
        let (source, repo) = repository();
        let page = repo
            .search_page_simple(&MemberSearchCondition::new(), &PageRequest::of(1, 2))
            .await
            .unwrap();
        assert_eq!(usernames(&page.content), vec!["carol", "dave"]);
        assert_eq!(page.total, 5);
        assert_eq!(
            source.executed(),
            vec![ExecutedStatement::Select {
                joined: true,
                windowed: false
            }]
        );
    }

    #[tokio::test]
    async fn test_page_size_above_configured_maximum() {
        let (source, _) = repository();
        let config = SearchConfig {
            max_page_size: 3,
            ..SearchConfig::default()
        };
        let repo = MemberRepository::with_config(source.clone(), config);
        let err = repo
            .search_page(&MemberSearchCondition::new(), &PageRequest::of(0, 4))
            .await
            .unwrap_err();
        assert!(err.is_invalid_page_request());
        assert_eq!(source.sessions_acquired(), 0);
    }

    #[tokio::test]
    async fn test_configured_strategy_is_used() {
        let (source, _) = repository();
        let config = SearchConfig {
            count_strategy: CountStrategy::Simple,
            ..SearchConfig::default()
        };
        let repo = MemberRepository::with_config(source.clone(), config);
        repo.search_page(&MemberSearchCondition::new(), &PageRequest::of(0, 2))
            .await
            .unwrap();
        assert!(matches!(
            source.executed().as_slice(),
            [ExecutedStatement::Select {
                windowed: false,
                ..
            }]
        ));
    }

    #[tokio::test]
    async fn test_count_keeps_join_only_for_team_name() {
        let (source, repo) = repository();
        assert_eq!(repo.count(&MemberSearchCondition::new()).await.unwrap(), 5);
        assert_eq!(
            repo.count(&MemberSearchCondition::new().team_name("A"))
                .await
                .unwrap(),
            3
        );
        assert_eq!(
            source.executed(),
            vec![
                ExecutedStatement::Count { joined: false },
                ExecutedStatement::Count { joined: true },
            ]
        );
    }

    #[tokio::test]
    async fn test_bulk_update_by_team_name() {
        let (source, repo) = repository();
        let affected = repo
            .bulk_update(
                &MemberSearchCondition::new().team_name("A").age_loe(20),
                MemberAssignment::AddAge(1),
            )
            .await
            .unwrap();
        assert_eq!(affected, 2);

        let ages: Vec<i32> = source.members().iter().map(|m| m.age).collect();
        assert_eq!(ages, vec![11, 21, 30, 40, 50]);
        assert_eq!(
            source.executed(),
            vec![ExecutedStatement::Update { joined: true }]
        );
    }

    #[tokio::test]
    async fn test_bulk_delete_without_team_filter() {
        let (source, repo) = repository();
        let affected = repo
            .bulk_delete(&MemberSearchCondition::new().age_goe(40))
            .await
            .unwrap();
        assert_eq!(affected, 2);
        assert_eq!(source.members().len(), 3);
        assert_eq!(
            source.executed(),
            vec![ExecutedStatement::Delete { joined: false }]
        );
    }

    #[tokio::test]
    async fn test_storage_failure_releases_session() {
        let (source, repo) = repository();
        source.fail_next("connection reset");
        let err = repo.search(&MemberSearchCondition::new()).await.unwrap_err();
        assert!(err.is_data_source());
        assert_eq!(source.open_sessions(), 0);
    }
}
