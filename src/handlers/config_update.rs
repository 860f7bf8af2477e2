use chrono::{DateTime, Utc};

use crate::{
    model::{Currency, event::ConfigUpdate},
    output::{ConfigUpdateData, OutputRecord, RecordPayload},
    state::EngineState,
};

/// Applies a known config key (currently only `reporting_currency`); unknown
/// keys are silently ignored, preserving documented behavior rather than
/// treating it as a bug. Emits `config_update` echoing `value` verbatim
/// regardless of whether the key was recognized.
pub fn handle(
    state: EngineState,
    event: &ConfigUpdate,
    event_timestamp: DateTime<Utc>,
) -> (EngineState, Vec<OutputRecord>) {
    let state = if event.key == "reporting_currency" {
        match Currency::new(event.value.clone()) {
            Ok(ccy) => state.update_config(&event.key, &ccy),
            Err(_) => state,
        }
    } else {
        state
    };

    let records = vec![OutputRecord::new(
        event_timestamp,
        RecordPayload::ConfigUpdate(ConfigUpdateData {
            key: event.key.clone(),
            value: event.value.clone(),
        }),
    )];

    (state, records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_key_is_ignored_but_still_emitted() {
        let state = EngineState::new(Currency::new("USD").unwrap());
        let event = ConfigUpdate {
            key: "some_future_flag".into(),
            value: "true".into(),
        };
        let (state, records) = handle(state, &event, Utc::now());
        assert_eq!(state.reporting_currency, Currency::new("USD").unwrap());
        assert_eq!(records[0].record_type(), "config_update");
    }

    #[test]
    fn reporting_currency_updates_state() {
        let state = EngineState::new(Currency::new("USD").unwrap());
        let event = ConfigUpdate {
            key: "reporting_currency".into(),
            value: "EUR".into(),
        };
        let (state, _) = handle(state, &event, Utc::now());
        assert_eq!(state.reporting_currency, Currency::new("EUR").unwrap());
    }
}
