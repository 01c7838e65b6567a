use chrono::{FixedOffset, NaiveDate, NaiveDateTime};

use matchday_widget::catalog::{Catalog, CatalogStore, EntityKind, League, Match, seed_catalog};
use matchday_widget::clock::FixedClock;
use matchday_widget::config::WidgetSettings;
use matchday_widget::error::WidgetError;
use matchday_widget::widget::{Command, Lifecycle, WidgetConfig, WidgetVariant};

fn toggle(kind: EntityKind, key: &str) -> Command {
    Command::ToggleSelection {
        kind,
        key: key.to_string(),
    }
}

fn league_store() -> CatalogStore {
    CatalogStore {
        leagues: Catalog::leagues(vec![
            League {
                key: "1".to_string(),
                name: "Premier".to_string(),
            },
            League {
                key: "2".to_string(),
                name: "La Liga".to_string(),
            },
        ]),
        ..CatalogStore::default()
    }
}

#[test]
fn starts_as_clean_draft() {
    let state = WidgetConfig::new();
    let snapshot = state.snapshot();
    assert_eq!(snapshot.variant, WidgetVariant::SingleMatch);
    assert_eq!(snapshot.lifecycle, Lifecycle::Draft);
    assert!(!snapshot.dirty);
    assert!(!snapshot.ever_published);
    assert!(!snapshot.can_publish);
    assert!(!snapshot.can_delete);
    assert_eq!(snapshot.status, "Widget unpublished");
    assert!(snapshot.published.is_none());
}

#[test]
fn league_scenario() {
    let store = league_store();
    let mut state = WidgetConfig::new();

    state
        .dispatch(Command::SetFilterText {
            kind: EntityKind::Leagues,
            text: "la".to_string(),
        })
        .unwrap();
    let rows = state.visible(&store, EntityKind::Leagues);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].key(), "2");
    assert!(!state.is_dirty());

    state.dispatch(toggle(EntityKind::Leagues, "1")).unwrap();
    assert!(state.is_dirty());
    assert_eq!(state.selection(EntityKind::Leagues).included_keys(), vec!["1"]);

    state.dispatch(Command::Publish).unwrap();
    assert!(!state.is_dirty());
    assert_eq!(state.lifecycle(), Lifecycle::Published);
    assert!(state.ever_published());
    assert_eq!(state.snapshot().status, "Widget published");

    state.dispatch(Command::Delete).unwrap();
    assert_eq!(state.lifecycle(), Lifecycle::Deleted);
    assert!(!state.is_live());
    assert!(state.is_dirty());
    assert!(state.ever_published());
}

#[test]
fn configuration_edits_mark_dirty() {
    let mut state = WidgetConfig::new();
    state
        .dispatch(Command::SetVariant(WidgetVariant::MatchList))
        .unwrap();
    assert!(state.is_dirty());

    let mut state = WidgetConfig::new();
    state.dispatch(toggle(EntityKind::Clubs, "6")).unwrap();
    assert!(state.is_dirty());
}

#[test]
fn filter_commands_are_dirty_neutral() {
    let mut state = WidgetConfig::new();
    let commands = vec![
        Command::SetFilterText {
            kind: EntityKind::Clubs,
            text: "real".to_string(),
        },
        Command::SetFilterDate {
            kind: EntityKind::Matches,
            date: NaiveDate::from_ymd_opt(2023, 11, 2),
        },
        Command::SetMatchLeagueFilter {
            text: "liga".to_string(),
        },
        Command::SelectSuggestion {
            kind: EntityKind::Leagues,
            value: "La Liga".to_string(),
        },
        Command::ToggleIncludedOnly {
            kind: EntityKind::Matches,
        },
    ];
    for command in commands {
        state.dispatch(command).unwrap();
        assert!(!state.is_dirty());
    }
    assert_eq!(state.filter(EntityKind::Leagues).text_query, "La Liga");
    assert_eq!(state.filter(EntityKind::Matches).league_query, "liga");
    assert!(state.filter(EntityKind::Matches).included_only);
    assert!(!state.filter(EntityKind::Clubs).included_only);
}

#[test]
fn filter_commands_keep_dirty_after_edit() {
    let mut state = WidgetConfig::new();
    state.dispatch(toggle(EntityKind::Leagues, "1")).unwrap();
    state
        .dispatch(Command::ToggleIncludedOnly {
            kind: EntityKind::Leagues,
        })
        .unwrap();
    assert!(state.is_dirty());
}

#[test]
fn included_only_can_be_configured_as_edit() {
    let settings = WidgetSettings {
        included_only_marks_dirty: true,
        ..WidgetSettings::default()
    };
    let mut state = WidgetConfig::with_settings(settings);
    state
        .dispatch(Command::ToggleIncludedOnly {
            kind: EntityKind::Clubs,
        })
        .unwrap();
    assert!(state.is_dirty());
}

#[test]
fn publish_without_changes_is_rejected() {
    let mut state = WidgetConfig::new();
    let before = state.snapshot();
    let err = state.dispatch(Command::Publish).unwrap_err();
    assert!(matches!(err, WidgetError::PreconditionNotMet(_)));
    assert_eq!(state.snapshot(), before);
    assert!(state.logs().back().is_some_and(|line| line.starts_with("[WARN]")));
}

#[test]
fn delete_before_publish_is_rejected() {
    let mut state = WidgetConfig::new();
    state.dispatch(toggle(EntityKind::Leagues, "1")).unwrap();
    let before = state.snapshot();
    let err = state.dispatch(Command::Delete).unwrap_err();
    assert!(matches!(err, WidgetError::PreconditionNotMet(_)));
    assert_eq!(state.snapshot(), before);
    assert_eq!(state.lifecycle(), Lifecycle::Draft);
}

#[test]
fn ever_published_survives_cycles() {
    let mut state = WidgetConfig::new();
    state.dispatch(toggle(EntityKind::Matches, "1")).unwrap();
    state.dispatch(Command::Publish).unwrap();
    for _ in 0..3 {
        state.dispatch(Command::Delete).unwrap();
        assert!(state.ever_published());
        assert!(state.can_publish());
        state.dispatch(Command::Publish).unwrap();
        assert!(state.ever_published());
        assert_eq!(state.lifecycle(), Lifecycle::Published);
    }
}

#[test]
fn edits_after_publish_keep_lifecycle() {
    let mut state = WidgetConfig::new();
    state.dispatch(toggle(EntityKind::Leagues, "1")).unwrap();
    state.dispatch(Command::Publish).unwrap();
    state
        .dispatch(Command::SetVariant(WidgetVariant::StandingsTable))
        .unwrap();
    assert_eq!(state.lifecycle(), Lifecycle::Published);
    assert!(state.is_dirty());
}

#[test]
fn publish_records_variant_and_scope() {
    let mut state = WidgetConfig::new();
    state
        .dispatch(Command::SetVariant(WidgetVariant::MatchList))
        .unwrap();
    state.dispatch(toggle(EntityKind::Leagues, "2")).unwrap();
    state.dispatch(toggle(EntityKind::Clubs, "6")).unwrap();
    state.dispatch(toggle(EntityKind::Clubs, "4")).unwrap();
    state.dispatch(toggle(EntityKind::Clubs, "6")).unwrap();
    state.dispatch(Command::Publish).unwrap();

    let published = state.published().expect("payload after publish");
    assert_eq!(published.variant, WidgetVariant::MatchList);
    assert_eq!(published.scope.leagues, vec!["2"]);
    assert_eq!(published.scope.clubs, vec!["4"]);
    assert!(published.scope.matches.is_empty());

    let json = serde_json::to_value(published).unwrap();
    assert_eq!(json["variant"], "MatchList");
    assert_eq!(json["scope"]["clubs"][0], "4");
}

#[test]
fn variant_controls_tabs() {
    assert_eq!(WidgetVariant::SingleMatch.tabs(), &EntityKind::ALL);
    assert_eq!(WidgetVariant::MatchList.tabs().len(), 3);
    assert_eq!(
        WidgetVariant::StandingsTable.tabs(),
        &[EntityKind::Leagues, EntityKind::Clubs]
    );
    assert_eq!(WidgetVariant::StandingsTable.next(), WidgetVariant::SingleMatch);
}

#[test]
fn included_only_view_follows_selection() {
    let store = seed_catalog();
    let mut state = WidgetConfig::new();
    state
        .dispatch(Command::ToggleIncludedOnly {
            kind: EntityKind::Clubs,
        })
        .unwrap();
    assert!(state.visible(&store, EntityKind::Clubs).is_empty());

    state.dispatch(toggle(EntityKind::Clubs, "2")).unwrap();
    let rows = state.visible(&store, EntityKind::Clubs);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].display_text(), "Real Madrid");
}

#[test]
fn page_uses_configured_size() {
    let store = seed_catalog();
    let settings = WidgetSettings {
        page_size: 4,
        ..WidgetSettings::default()
    };
    let state = WidgetConfig::with_settings(settings);
    let page = state.page(&store, EntityKind::Clubs, 2);
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.page_count, 2);
    assert_eq!(page.total, 6);
}

#[test]
fn log_is_bounded() {
    let mut state = WidgetConfig::new();
    for idx in 0..250 {
        state.dispatch(toggle(EntityKind::Leagues, &idx.to_string())).unwrap();
    }
    assert_eq!(state.logs().len(), 200);
}

fn late_kickoff_store() -> CatalogStore {
    let kickoff = NaiveDateTime::parse_from_str("2026-03-01 23:30", "%Y-%m-%d %H:%M").unwrap();
    CatalogStore::new(
        Vec::new(),
        Vec::new(),
        vec![Match {
            key: "1".to_string(),
            home_team: "A".to_string(),
            away_team: "B".to_string(),
            kickoff,
            league_ref: "1".to_string(),
        }],
    )
}

fn clock_at(today: NaiveDate, offset_hours: i32) -> FixedClock {
    FixedClock {
        today,
        offset: FixedOffset::east_opt(offset_hours * 3600).unwrap(),
    }
}

#[test]
fn clock_offset_decides_match_day() {
    let store = late_kickoff_store();
    let day = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
    let filter_day = Command::SetFilterDate {
        kind: EntityKind::Matches,
        date: Some(day),
    };

    let mut utc = WidgetConfig::with_clock(WidgetSettings::default(), clock_at(day, 0));
    utc.dispatch(filter_day.clone()).unwrap();
    assert!(utc.visible(&store, EntityKind::Matches).is_empty());

    let mut east = WidgetConfig::with_clock(WidgetSettings::default(), clock_at(day, 2));
    east.dispatch(filter_day).unwrap();
    let rows = east.visible(&store, EntityKind::Matches);
    assert_eq!(rows.len(), 1);
    assert_eq!(east.page(&store, EntityKind::Matches, 1).total, 1);
}

#[test]
fn filter_today_reads_the_clock() {
    let store = seed_catalog();
    let today = NaiveDate::from_ymd_opt(2023, 11, 2).unwrap();
    let mut state = WidgetConfig::with_clock(WidgetSettings::default(), clock_at(today, 0));
    state
        .dispatch(Command::SetFilterToday {
            kind: EntityKind::Matches,
        })
        .unwrap();
    assert_eq!(state.filter(EntityKind::Matches).date_exact, Some(today));
    assert!(!state.is_dirty());
    let rows = state.visible(&store, EntityKind::Matches);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].key(), "2");
}

#[test]
fn rejected_commands_only_add_a_warning() {
    let mut state = WidgetConfig::new();
    let before = state.snapshot();
    let logged = state.logs().len();

    assert!(state.dispatch(Command::Delete).is_err());
    assert!(state.dispatch(Command::Publish).is_err());

    assert_eq!(state.snapshot(), before);
    assert_eq!(state.logs().len(), logged + 2);
    assert!(state.logs().iter().all(|line| line.starts_with("[WARN]")));
}
