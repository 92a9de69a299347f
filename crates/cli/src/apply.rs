//! Apply stage — one "mark finished" call per matched pair. A failed
//! update never aborts the rest; failures are collected into the tally.

use chrono::NaiveDate;
use serde::Serialize;

use shelfmark_abs::AbsClient;
use shelfmark_resolve::MatchPair;

#[derive(Debug, Serialize)]
pub struct ApplyOutcome {
    pub applied: usize,
    pub failed: Vec<ApplyFailure>,
}

#[derive(Debug, Serialize)]
pub struct ApplyFailure {
    pub item_id: String,
    pub title: String,
    pub error: String,
}

/// Mark every matched item finished, in result order. The export's read
/// date (when present) is sent as the finish timestamp.
pub fn apply_matches(client: &AbsClient, pairs: &[MatchPair], progress: bool) -> ApplyOutcome {
    let mut applied = 0;
    let mut failed = Vec::new();

    for pair in pairs {
        let finished_at = pair.source.date_read.map(date_to_epoch_ms);
        match client.mark_finished(&pair.item.id, finished_at) {
            Ok(()) => {
                applied += 1;
                if progress {
                    eprintln!("  marked finished: {}", pair.source.title);
                }
            }
            Err(e) => failed.push(ApplyFailure {
                item_id: pair.item.id.clone(),
                title: pair.source.title.clone(),
                error: e.to_string(),
            }),
        }
    }

    ApplyOutcome { applied, failed }
}

fn date_to_epoch_ms(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .unwrap()
        .and_utc()
        .timestamp_millis()
}
