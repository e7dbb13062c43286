mod common;

use common::strategies::*;
use common::{seed_fixtures, MemberFixture};
use member_query_core::{
    CountStrategy, InMemoryDataSource, MemberRepository, MemberSearchCondition, MemberTeamRow,
    PageRequest, SortOrder,
};
use proptest::prelude::*;

fn repository(members: &[MemberFixture]) -> MemberRepository<InMemoryDataSource> {
    MemberRepository::new(seed_fixtures(members))
}

/// Plain field comparisons, with blank text treated as absent
fn satisfies(row: &MemberTeamRow, condition: &MemberSearchCondition) -> bool {
    let text = |value: &Option<String>| value.clone().filter(|v| !v.trim().is_empty());

    text(&condition.username).map_or(true, |username| row.username == username)
        && text(&condition.team_name)
            .map_or(true, |team| row.team_name.as_deref() == Some(team.as_str()))
        && condition.age_goe.map_or(true, |bound| row.age >= bound)
        && condition.age_loe.map_or(true, |bound| row.age <= bound)
}

fn all_pages(
    repo: &MemberRepository<InMemoryDataSource>,
    condition: &MemberSearchCondition,
    sort: &[SortOrder],
    size: i64,
    strategy: CountStrategy,
) -> Vec<MemberTeamRow> {
    tokio_test::block_on(async {
        let mut rows = Vec::new();
        let mut page_index = 0;
        loop {
            let mut request = PageRequest::of(page_index, size);
            request.sort = sort.to_vec();
            let page = repo
                .search_page_with(condition, &request, strategy)
                .await
                .unwrap();
            let done = page.is_last() || page.content.is_empty();
            rows.extend(page.content);
            if done {
                return rows;
            }
            page_index += 1;
        }
    })
}

proptest! {
    /// Property: An all-absent condition returns exactly the unfiltered rows
    #[test]
    fn empty_condition_returns_every_member(members in member_table_strategy()) {
        let repo = repository(&members);
        let rows = tokio_test::block_on(repo.search(&MemberSearchCondition::new())).unwrap();
        prop_assert_eq!(rows.len(), members.len());
    }

    /// Property: The search returns exactly the rows of the unfiltered set that pass every
    /// present filter, checked field by field
    #[test]
    fn search_returns_exactly_the_matching_rows(
        members in member_table_strategy(),
        condition in condition_strategy(),
    ) {
        let repo = repository(&members);
        let everything = tokio_test::block_on(repo.search(&MemberSearchCondition::new())).unwrap();
        let mut rows = tokio_test::block_on(repo.search(&condition)).unwrap();

        for row in &rows {
            if let Some(username) = &condition.username {
                prop_assert_eq!(&row.username, username);
            }
            if let Some(team_name) = &condition.team_name {
                prop_assert_eq!(row.team_name.as_ref(), Some(team_name));
            }
            if let Some(age_goe) = condition.age_goe {
                prop_assert!(row.age >= age_goe);
            }
            if let Some(age_loe) = condition.age_loe {
                prop_assert!(row.age <= age_loe);
            }
        }

        let mut expected: Vec<MemberTeamRow> = everything
            .into_iter()
            .filter(|row| satisfies(row, &condition))
            .collect();
        expected.sort_by_key(|row| row.member_id);
        rows.sort_by_key(|row| row.member_id);
        prop_assert_eq!(rows, expected);
    }

    /// Property: The total does not depend on which page is requested, or how
    #[test]
    fn total_is_independent_of_the_window(
        members in member_table_strategy(),
        condition in condition_strategy(),
        size in page_size_strategy(),
        page_index in 0i64..6,
    ) {
        let repo = repository(&members);
        let expected = tokio_test::block_on(repo.search(&condition)).unwrap().len() as i64;
        let request = PageRequest::of(page_index, size);

        let simple = tokio_test::block_on(repo.search_page_simple(&condition, &request)).unwrap();
        let complex = tokio_test::block_on(repo.search_page_complex(&condition, &request)).unwrap();
        let counted = tokio_test::block_on(repo.count(&condition)).unwrap();

        prop_assert_eq!(simple.total, expected);
        prop_assert_eq!(complex.total, expected);
        prop_assert_eq!(counted, expected);
        prop_assert_eq!(simple.content, complex.content);
    }

    /// Property: Concatenated pages reproduce the full ordered result exactly once
    #[test]
    fn pages_partition_the_ordered_result(
        members in member_table_strategy(),
        condition in condition_strategy(),
        sort in sort_strategy(),
        size in page_size_strategy(),
    ) {
        let repo = repository(&members);
        let full = tokio_test::block_on(repo.search_with_order(&condition, &sort)).unwrap();

        for strategy in [CountStrategy::Simple, CountStrategy::Complex] {
            let paged = all_pages(&repo, &condition, &sort, size, strategy);
            prop_assert_eq!(&paged, &full);
        }
    }

    /// Property: Unsorted paging walks the rows in member id order
    #[test]
    fn default_paging_follows_member_id(
        members in member_table_strategy(),
        size in page_size_strategy(),
    ) {
        let repo = repository(&members);
        let rows = all_pages(&repo, &MemberSearchCondition::new(), &[], size, CountStrategy::Complex);
        prop_assert_eq!(rows.len(), members.len());
        prop_assert!(rows.windows(2).all(|pair| pair[0].member_id < pair[1].member_id));
    }
}
