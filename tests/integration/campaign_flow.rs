//! Campaign ordering: invite before claim, file order, failures skip.

use std::time::Duration;

use tomabox::testing::{Call, ScriptedApi};
use tomabox::{
    load_campaign_records, AccountFile, AccountStore, CampaignRunner, Config, Console,
    RecordOutcome, TokenRecord,
};

fn runner(api: ScriptedApi) -> CampaignRunner<ScriptedApi> {
    let config = Config::new("0000abcd", ".")
        .unwrap()
        .with_delays(Duration::ZERO, Duration::ZERO, Duration::ZERO);
    CampaignRunner::new(api, &config, Console::quiet())
}

#[tokio::test]
async fn records_visited_in_file_order_with_invite_first() {
    let tmp = tempfile::tempdir().unwrap();
    let store = AccountStore::new(tmp.path());
    let path = store
        .save(
            1,
            &AccountFile::new(vec![
                TokenRecord::new("T1", "Alice"),
                TokenRecord::new("T2", "Bob"),
                TokenRecord::new("T3", "Cara"),
            ]),
        )
        .unwrap();

    let records = load_campaign_records(&store, &path, &Console::quiet());
    let runner = runner(ScriptedApi::new());
    let summary = runner.run_pass(&records).await;

    assert_eq!(summary.claimed, 3);
    assert_eq!(
        runner.api().calls(),
        vec![
            Call::ApplyInvite("T1".into()),
            Call::OpenTreasureBox("T1".into()),
            Call::ApplyInvite("T2".into()),
            Call::OpenTreasureBox("T2".into()),
            Call::ApplyInvite("T3".into()),
            Call::OpenTreasureBox("T3".into()),
        ]
    );
}

#[tokio::test]
async fn rejected_invite_never_claims_and_pass_continues() {
    let api = ScriptedApi::new()
        .with_invite_rejection("T1", 1, "already joined")
        .with_reward("T2", "300");
    let runner = runner(api);
    let records = vec![
        TokenRecord::new("T1", "Alice"),
        TokenRecord::new("T2", "Bob"),
    ];

    let summary = runner.run_pass(&records).await;

    assert_eq!(summary.join_failed, 1);
    assert_eq!(summary.claimed, 1);
    let calls = runner.api().calls();
    assert!(!calls.contains(&Call::OpenTreasureBox("T1".into())));
    assert_eq!(calls.last(), Some(&Call::OpenTreasureBox("T2".into())));
}

#[tokio::test]
async fn transport_error_is_non_fatal() {
    let api = ScriptedApi::new().with_invite_error("T1", "connection reset");
    let runner = runner(api);

    let outcome = runner.process(&TokenRecord::new("T1", "Alice")).await;
    assert!(matches!(outcome, RecordOutcome::JoinFailed(ref m) if m.contains("connection reset")));

    let summary = runner
        .run_pass(&[
            TokenRecord::new("T1", "Alice"),
            TokenRecord::new("T2", "Bob"),
        ])
        .await;
    assert_eq!(summary.total(), 2);
    assert_eq!(summary.claimed, 1);
}

#[tokio::test]
async fn empty_batch_still_completes_passes() {
    let runner = runner(ScriptedApi::new());
    let summaries = runner.run(&[], Some(2)).await;
    assert_eq!(summaries.len(), 2);
    assert!(runner.api().calls().is_empty());
}
