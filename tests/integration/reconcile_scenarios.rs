//! End-to-end reconciliation scenarios against a scripted remote.

use std::time::Duration;

use tomabox::testing::ScriptedApi;
use tomabox::{
    AccountFile, AccountStore, Config, Console, OverflowPolicy, TokenMinter, TokenRecord,
};

fn minter(api: ScriptedApi) -> TokenMinter<ScriptedApi> {
    let config = Config::new("0000abcd", ".")
        .unwrap()
        .with_delays(Duration::ZERO, Duration::ZERO, Duration::ZERO);
    TokenMinter::new(api, &config, Console::quiet())
}

fn queries(n: usize) -> Vec<String> {
    (1..=n).map(|i| format!("query_id={i}")).collect()
}

/// A remote that answers `query_id=i` with token `T{i}` and name `User{i}`.
fn distinct_api(n: usize) -> ScriptedApi {
    (1..=n).fold(ScriptedApi::new(), |api, i| {
        api.with_login(
            &format!("query_id={i}"),
            &format!("T{i}"),
            Some(&format!("User{i}")),
        )
    })
}

fn file_sizes(store: &AccountStore) -> Vec<(u64, usize)> {
    store
        .discover()
        .unwrap()
        .into_iter()
        .map(|f| (f.number, store.load(&f.path).unwrap().len()))
        .collect()
}

#[tokio::test]
async fn five_queries_capacity_two_makes_three_files() {
    let tmp = tempfile::tempdir().unwrap();
    let store = AccountStore::new(tmp.path());

    let report = store
        .reconcile(
            &queries(5),
            2,
            OverflowPolicy::Truncate,
            &minter(distinct_api(5)),
            &Console::quiet(),
        )
        .await
        .unwrap();

    assert_eq!(file_sizes(&store), vec![(1, 2), (2, 2), (3, 1)]);
    assert_eq!(report.created.len(), 3);
    assert!(report.updated.is_empty());
    assert!(tmp.path().join("accounts-3.json").exists());
}

#[tokio::test]
async fn remint_updates_existing_record_in_place() {
    let tmp = tempfile::tempdir().unwrap();
    let store = AccountStore::new(tmp.path());
    store
        .save(1, &AccountFile::new(vec![TokenRecord::new("T1", "Alice")]))
        .unwrap();

    let api = ScriptedApi::new().with_login("query_id=alice", "T2", Some("Alice"));
    let report = store
        .reconcile(
            &["query_id=alice".to_string()],
            10,
            OverflowPolicy::Truncate,
            &minter(api),
            &Console::quiet(),
        )
        .await
        .unwrap();

    let file = store.load(&store.path_for(1)).unwrap();
    assert_eq!(file.accounts, vec![TokenRecord::new("T2", "Alice")]);
    assert_eq!(report.refreshed, 1);
    assert!(report.created.is_empty());
    assert_eq!(store.discover().unwrap().len(), 1);
}

#[tokio::test]
async fn update_lands_in_first_file_holding_the_name() {
    let tmp = tempfile::tempdir().unwrap();
    let store = AccountStore::new(tmp.path());
    store
        .save(
            1,
            &AccountFile::new(vec![
                TokenRecord::new("T1", "Alice"),
                TokenRecord::new("T5", "Bob"),
            ]),
        )
        .unwrap();
    store
        .save(2, &AccountFile::new(vec![TokenRecord::new("T9", "Alice")]))
        .unwrap();

    let api = ScriptedApi::new().with_login("q", "NEW", Some("Alice"));
    store
        .reconcile(
            &["q".to_string()],
            2,
            OverflowPolicy::Truncate,
            &minter(api),
            &Console::quiet(),
        )
        .await
        .unwrap();

    let first = store.load(&store.path_for(1)).unwrap();
    let second = store.load(&store.path_for(2)).unwrap();
    assert_eq!(first.accounts[0], TokenRecord::new("NEW", "Alice"));
    assert_eq!(second.accounts[0], TokenRecord::new("T9", "Alice"));
}

#[tokio::test]
async fn rerun_with_known_names_is_noop() {
    let tmp = tempfile::tempdir().unwrap();
    let store = AccountStore::new(tmp.path());

    store
        .reconcile(
            &queries(4),
            3,
            OverflowPolicy::Truncate,
            &minter(distinct_api(4)),
            &Console::quiet(),
        )
        .await
        .unwrap();
    let before: Vec<_> = store
        .discover()
        .unwrap()
        .iter()
        .map(|f| std::fs::metadata(&f.path).unwrap().modified().unwrap())
        .collect();

    std::thread::sleep(Duration::from_millis(20));
    let report = store
        .reconcile(
            &queries(4),
            3,
            OverflowPolicy::Truncate,
            &minter(distinct_api(4)),
            &Console::quiet(),
        )
        .await
        .unwrap();

    assert!(report.is_noop(), "unexpected writes: {report:?}");
    let after: Vec<_> = store
        .discover()
        .unwrap()
        .iter()
        .map(|f| std::fs::metadata(&f.path).unwrap().modified().unwrap())
        .collect();
    assert_eq!(before, after);
    assert_eq!(file_sizes(&store), vec![(1, 3), (2, 1)]);
}

#[tokio::test]
async fn new_identities_top_up_partial_file() {
    let tmp = tempfile::tempdir().unwrap();
    let store = AccountStore::new(tmp.path());
    store
        .save(1, &AccountFile::new(vec![TokenRecord::new("T0", "Zed")]))
        .unwrap();

    store
        .reconcile(
            &queries(2),
            3,
            OverflowPolicy::Truncate,
            &minter(distinct_api(2)),
            &Console::quiet(),
        )
        .await
        .unwrap();

    let names: Vec<String> = store
        .load(&store.path_for(1))
        .unwrap()
        .accounts
        .into_iter()
        .map(|a| a.first_name)
        .collect();
    assert_eq!(names, vec!["Zed", "User1", "User2"]);
    assert_eq!(store.discover().unwrap().len(), 1);
}

#[tokio::test]
async fn failed_mints_are_skipped() {
    let tmp = tempfile::tempdir().unwrap();
    let store = AccountStore::new(tmp.path());
    // Only odd payloads have a scripted login.
    let api = (1..=6)
        .filter(|i| i % 2 == 1)
        .fold(ScriptedApi::new(), |api, i| {
            api.with_login(&format!("query_id={i}"), &format!("T{i}"), Some(&format!("User{i}")))
        });

    store
        .reconcile(
            &queries(6),
            2,
            OverflowPolicy::Truncate,
            &minter(api),
            &Console::quiet(),
        )
        .await
        .unwrap();

    // Chunks: [1,2] -> User1, [3,4] -> User3, [5,6] -> User5.
    assert_eq!(file_sizes(&store), vec![(1, 1), (2, 1), (3, 1)]);
}
