use arena_curve_core::models::account::{AccountKey, AccountTable};
use arena_curve_core::models::active_set::ActiveSet;
use arena_curve_core::models::aligned::DomainRange;
use arena_curve_core::models::query::CurveQuery;
use arena_curve_core::models::settings::{EngineConfig, FeedConfig, DEFAULT_PALETTE};
use arena_curve_core::models::snapshot::{NormalizedPoint, RawSnapshot};

fn key(id: i64) -> AccountKey {
    AccountKey::from_id(id)
}

fn point(time_key: &str, account_id: i64, value: f64, name: &str) -> NormalizedPoint {
    NormalizedPoint {
        time_key: time_key.into(),
        display_time: time_key.into(),
        instant: None,
        account_id,
        value,
        display_name: name.into(),
    }
}

// ═══════════════════════════════════════════════════════════════════
//  AccountKey
// ═══════════════════════════════════════════════════════════════════

mod account_key {
    use super::*;

    #[test]
    fn derived_from_id() {
        assert_eq!(key(1).as_str(), "account_1");
        assert_eq!(key(42).to_string(), "account_42");
    }

    #[test]
    fn reversible() {
        for id in [0, 1, 7, 12345, -5] {
            assert_eq!(key(id).account_id(), Some(id));
        }
    }

    #[test]
    fn same_id_same_key() {
        assert_eq!(key(3), key(3));
        assert_eq!(AccountKey::from(3), key(3));
        assert_ne!(key(3), key(4));
    }

    #[test]
    fn foreign_key_has_no_id() {
        let k: AccountKey = serde_json::from_str("\"whale\"").unwrap();
        assert_eq!(k.account_id(), None);
    }

    #[test]
    fn serializes_as_plain_string() {
        assert_eq!(serde_json::to_string(&key(9)).unwrap(), "\"account_9\"");
    }
}

// ═══════════════════════════════════════════════════════════════════
//  RawSnapshot decoding
// ═══════════════════════════════════════════════════════════════════

mod raw_snapshot {
    use super::*;

    #[test]
    fn decodes_backend_field_names() {
        let json = r#"{
            "timestamp": 1704067200,
            "datetime_str": "2024-01-01T00:00:00",
            "date": "2024-01-01",
            "account_id": 3,
            "total_assets": 10500.25,
            "cash": 500.0,
            "positions_value": 10000.25,
            "user_id": 11,
            "username": "DeepSeek"
        }"#;
        let s: RawSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(s.timestamp, Some(1704067200.0));
        assert_eq!(s.iso_time.as_deref(), Some("2024-01-01T00:00:00"));
        assert_eq!(s.date_label.as_deref(), Some("2024-01-01"));
        assert_eq!(s.account_id, 3);
        assert_eq!(s.total_assets, 10500.25);
        assert_eq!(s.display_name.as_deref(), Some("DeepSeek"));
    }

    #[test]
    fn decodes_camel_case_aliases() {
        let json = r#"{
            "isoTime": "2024-01-01T00:00",
            "dateLabel": "Jan 1",
            "accountId": 2,
            "totalAssets": 200,
            "displayName": "Qwen"
        }"#;
        let s: RawSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(s.iso_time.as_deref(), Some("2024-01-01T00:00"));
        assert_eq!(s.date_label.as_deref(), Some("Jan 1"));
        assert_eq!(s.account_id, 2);
        assert_eq!(s.total_assets, 200.0);
        assert_eq!(s.display_name.as_deref(), Some("Qwen"));
    }

    #[test]
    fn time_fields_are_optional() {
        let s: RawSnapshot = serde_json::from_str(r#"{"account_id": 1, "total_assets": 5}"#).unwrap();
        assert!(s.timestamp.is_none());
        assert!(s.iso_time.is_none());
        assert!(s.date_label.is_none());
        assert!(s.display_name.is_none());
    }

    #[test]
    fn numeric_string_amount_is_parsed() {
        let s: RawSnapshot =
            serde_json::from_str(r#"{"account_id": 1, "total_assets": " 123.5 "}"#).unwrap();
        assert_eq!(s.total_assets, 123.5);
    }

    #[test]
    fn invalid_amounts_become_zero() {
        for raw in [
            r#"{"account_id": 1, "total_assets": "abc"}"#,
            r#"{"account_id": 1, "total_assets": null}"#,
            r#"{"account_id": 1, "total_assets": true}"#,
            r#"{"account_id": 1, "total_assets": {"usd": 5}}"#,
            r#"{"account_id": 1}"#,
        ] {
            let s: RawSnapshot = serde_json::from_str(raw).unwrap();
            assert_eq!(s.total_assets, 0.0, "input: {raw}");
        }
    }

    #[test]
    fn string_timestamp_is_accepted() {
        let s: RawSnapshot =
            serde_json::from_str(r#"{"account_id": 1, "timestamp": "1704067200"}"#).unwrap();
        assert_eq!(s.timestamp, Some(1704067200.0));
    }

    #[test]
    fn garbage_timestamp_is_absent() {
        let s: RawSnapshot =
            serde_json::from_str(r#"{"account_id": 1, "timestamp": "soon"}"#).unwrap();
        assert!(s.timestamp.is_none());
    }

    #[test]
    fn missing_account_id_is_rejected() {
        let result: Result<RawSnapshot, _> = serde_json::from_str(r#"{"total_assets": 5}"#);
        assert!(result.is_err());
    }

    #[test]
    fn builders() {
        let s = RawSnapshot::at_iso("2024-01-01T00:00", 1, 100.0).named("Alpha");
        assert_eq!(s.iso_time.as_deref(), Some("2024-01-01T00:00"));
        assert_eq!(s.display_name.as_deref(), Some("Alpha"));

        let e = RawSnapshot::at_epoch(1704067200.0, 2, 50.0);
        assert_eq!(e.timestamp, Some(1704067200.0));
        assert!(e.iso_time.is_none());
    }
}

// ═══════════════════════════════════════════════════════════════════
//  AccountTable
// ═══════════════════════════════════════════════════════════════════

mod account_table {
    use super::*;

    #[test]
    fn tracks_max_value_per_account() {
        let table = AccountTable::from_points(&[
            point("t0", 1, 100.0, "A"),
            point("t1", 1, 300.0, "A"),
            point("t2", 1, 200.0, "A"),
        ]);
        assert_eq!(table.get(1).unwrap().max_value, 300.0);
    }

    #[test]
    fn last_display_name_wins() {
        let table = AccountTable::from_points(&[
            point("t0", 1, 100.0, "Account 1"),
            point("t1", 1, 100.0, "Renamed"),
        ]);
        assert_eq!(table.get(1).unwrap().display_name, "Renamed");
    }

    #[test]
    fn enumerates_by_ascending_id() {
        let table = AccountTable::from_points(&[
            point("t0", 9, 1.0, "I"),
            point("t0", 2, 1.0, "B"),
            point("t0", 5, 1.0, "E"),
        ]);
        let ids: Vec<i64> = table.iter().map(|a| a.account_id).collect();
        assert_eq!(ids, vec![2, 5, 9]);
        assert_eq!(table.keys(), vec![key(2), key(5), key(9)]);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn empty_table() {
        let table = AccountTable::from_points(&[]);
        assert!(table.is_empty());
        assert!(table.get(1).is_none());
        assert!(table.keys().is_empty());
    }
}

// ═══════════════════════════════════════════════════════════════════
//  ActiveSet
// ═══════════════════════════════════════════════════════════════════

mod active_set {
    use super::*;

    fn universe(ids: &[i64]) -> Vec<AccountKey> {
        ids.iter().map(|&id| key(id)).collect()
    }

    // ── reconcile ─────────────────────────────────────────────────

    #[test]
    fn first_reconcile_activates_everything() {
        let mut set = ActiveSet::new();
        set.reconcile(&universe(&[1, 2, 3]));
        assert_eq!(set, ActiveSet::all(universe(&[1, 2, 3])));
    }

    #[test]
    fn reconcile_keeps_surviving_selection() {
        let mut set = ActiveSet::all(universe(&[1, 2]));
        set.reconcile(&universe(&[1, 2, 3]));
        // account 3 is new but was never selected
        assert_eq!(set, ActiveSet::all(universe(&[1, 2])));
    }

    #[test]
    fn reconcile_drops_vanished_accounts() {
        let mut set = ActiveSet::all(universe(&[1, 2]));
        set.reconcile(&universe(&[2, 3]));
        assert_eq!(set, ActiveSet::all(universe(&[2])));
    }

    #[test]
    fn reconcile_resets_when_nothing_survives() {
        let mut set = ActiveSet::all(universe(&[1]));
        set.reconcile(&universe(&[4, 5]));
        assert_eq!(set, ActiveSet::all(universe(&[4, 5])));
    }

    #[test]
    fn reconciled_returns_new_value() {
        let set = ActiveSet::new().reconciled(&universe(&[7]));
        assert!(set.contains(&key(7)));
        assert_eq!(set.len(), 1);
    }

    // ── toggle ────────────────────────────────────────────────────

    #[test]
    fn toggle_removes_active_key() {
        let mut set = ActiveSet::all(universe(&[1, 2]));
        set.toggle(&key(1));
        assert_eq!(set, ActiveSet::all(universe(&[2])));
    }

    #[test]
    fn toggle_adds_inactive_key() {
        let mut set = ActiveSet::all(universe(&[1]));
        set.toggle(&key(2));
        assert_eq!(set, ActiveSet::all(universe(&[1, 2])));
    }

    #[test]
    fn toggle_refuses_to_empty_the_set() {
        let mut set = ActiveSet::all(universe(&[1]));
        set.toggle(&key(1));
        assert_eq!(set, ActiveSet::all(universe(&[1])));
    }

    #[test]
    fn toggle_off_and_on_round_trips() {
        let original = ActiveSet::all(universe(&[1]));
        let round_trip = original.clone().toggled(&key(1)).toggled(&key(1));
        assert_eq!(round_trip, original);
    }

    #[test]
    fn toggle_sequence_never_empties() {
        let mut set = ActiveSet::all(universe(&[1, 2, 3]));
        let sequence = [1, 2, 3, 3, 1, 2, 2, 3, 1, 1, 2, 3, 3, 3];
        for id in sequence {
            set.toggle(&key(id));
            assert!(!set.is_empty(), "emptied after toggling {id}");
        }
    }

    // ── hover ─────────────────────────────────────────────────────

    #[test]
    fn highlighted_without_hover() {
        let set = ActiveSet::all(universe(&[1, 2]));
        assert!(set.is_highlighted(&key(1), None));
        assert!(!set.is_highlighted(&key(3), None));
    }

    #[test]
    fn hover_highlights_only_the_hovered_series() {
        let set = ActiveSet::all(universe(&[1, 2]));
        assert!(set.is_highlighted(&key(1), Some(&key(1))));
        assert!(!set.is_highlighted(&key(2), Some(&key(1))));
    }

    #[test]
    fn hovering_an_inactive_series_does_not_highlight_it() {
        let set = ActiveSet::all(universe(&[1]));
        assert!(!set.is_highlighted(&key(2), Some(&key(2))));
    }

    #[test]
    fn muted_when_inactive_or_not_hovered() {
        let set = ActiveSet::all(universe(&[1, 2]));
        assert!(!set.is_muted(&key(1), None));
        assert!(set.is_muted(&key(3), None));
        assert!(set.is_muted(&key(2), Some(&key(1))));
        assert!(!set.is_muted(&key(1), Some(&key(1))));
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Settings
// ═══════════════════════════════════════════════════════════════════

mod settings {
    use super::*;

    #[test]
    fn engine_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.palette.len(), DEFAULT_PALETTE.len());
        assert_eq!(config.palette[0], "#F0B90B");
        assert_eq!(config.fallback_color, "#7E8494");
        assert_eq!(config.default_domain, [0.0, 100_000.0]);
        assert_eq!(config.padding_ratio, 0.1);
        assert_eq!(config.min_padding, 50.0);
        assert_eq!(config.max_points, None);
        assert_eq!(config.tick_divisions, 8);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = EngineConfig::from_json(r#"{"max_points": 120, "min_padding": 10}"#).unwrap();
        assert_eq!(config.max_points, Some(120));
        assert_eq!(config.min_padding, 10.0);
        assert_eq!(config.padding_ratio, 0.1);
        assert_eq!(config.palette.len(), 8);
    }

    #[test]
    fn rejects_inverted_default_domain() {
        let err = EngineConfig::from_json(r#"{"default_domain": [10, 5]}"#).unwrap_err();
        assert!(err.to_string().contains("default_domain"));
    }

    #[test]
    fn rejects_negative_padding() {
        assert!(EngineConfig::from_json(r#"{"padding_ratio": -0.1}"#).is_err());
        assert!(EngineConfig::from_json(r#"{"min_padding": -1}"#).is_err());
    }

    #[test]
    fn rejects_zero_window_and_ticks() {
        assert!(EngineConfig::from_json(r#"{"max_points": 0}"#).is_err());
        assert!(EngineConfig::from_json(r#"{"tick_divisions": 0}"#).is_err());
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(EngineConfig::from_json("{not json").is_err());
    }

    #[test]
    fn feed_defaults() {
        let feed = FeedConfig::default();
        assert_eq!(feed.refresh_interval_secs, 60);
        assert_eq!(feed.dedup_interval_secs, 30);
        assert!(feed.validate().is_ok());
    }

    #[test]
    fn feed_url_joins_without_double_slash() {
        let feed = FeedConfig::from_json(
            r#"{"base_url": "https://arena.example.com/", "curve_path": "/api/curve"}"#,
        )
        .unwrap();
        assert_eq!(feed.curve_url(), "https://arena.example.com/api/curve");
    }

    #[test]
    fn feed_rejects_bad_values() {
        assert!(FeedConfig::from_json(r#"{"base_url": "ftp://x"}"#).is_err());
        assert!(FeedConfig::from_json(r#"{"curve_path": "api"}"#).is_err());
        assert!(FeedConfig::from_json(r#"{"refresh_interval_secs": 0}"#).is_err());
    }
}

// ═══════════════════════════════════════════════════════════════════
//  CurveQuery / DomainRange
// ═══════════════════════════════════════════════════════════════════

mod misc {
    use super::*;

    #[test]
    fn default_query() {
        let q = CurveQuery::default();
        assert_eq!(q.timeframe, "5m");
        assert_eq!(q.trading_mode, "paper");
        assert_eq!(q.cache_key(), "asset-curve-5m-paper");
    }

    #[test]
    fn cache_key_distinguishes_queries() {
        assert_ne!(
            CurveQuery::new("5m", "paper").cache_key(),
            CurveQuery::new("1h", "paper").cache_key()
        );
    }

    #[test]
    fn domain_range_contains_bounds() {
        let range = DomainRange::new(10.0, 20.0);
        assert!(range.contains(10.0));
        assert!(range.contains(20.0));
        assert!(!range.contains(20.5));
        let pair: [f64; 2] = range.into();
        assert_eq!(pair, [10.0, 20.0]);
    }

    #[test]
    fn domain_range_default_is_empty_chart_range() {
        assert_eq!(DomainRange::default(), DomainRange::new(0.0, 100_000.0));
    }
}
