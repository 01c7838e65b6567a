use chrono::{Duration, FixedOffset, NaiveDate};
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use matchday_widget::catalog::{CatalogStore, Club, EntityKind, League, Match};
use matchday_widget::filter::{FilterCriteria, paginate, visible_entities};
use matchday_widget::selection::SelectionSet;
use matchday_widget::suggest::suggestions;

fn sample_store() -> CatalogStore {
    let leagues: Vec<League> = (0..40)
        .map(|idx| League {
            key: format!("l{idx}"),
            name: format!("League {idx}"),
        })
        .collect();
    let clubs: Vec<Club> = (0..400)
        .map(|idx| Club {
            key: format!("c{idx}"),
            name: format!("Club {idx} FC"),
        })
        .collect();
    let start = NaiveDate::from_ymd_opt(2026, 1, 1)
        .and_then(|d| d.and_hms_opt(12, 0, 0))
        .expect("valid start");
    let matches: Vec<Match> = (0..2000)
        .map(|idx| Match {
            key: format!("m{idx}"),
            home_team: format!("Club {} FC", idx % 400),
            away_team: format!("Club {} FC", (idx * 7 + 3) % 400),
            kickoff: start + Duration::hours(idx as i64 * 5),
            league_ref: format!("l{}", idx % 40),
        })
        .collect();
    CatalogStore::new(leagues, clubs, matches)
}

fn bench_visible_matches(c: &mut Criterion) {
    let store = sample_store();
    let selection: SelectionSet = (0..2000)
        .step_by(3)
        .map(|idx| (format!("m{idx}"), true))
        .collect();
    let criteria = FilterCriteria {
        text_query: "club 1".to_string(),
        date_exact: None,
        included_only: true,
        league_query: "league 1".to_string(),
    };
    let offset = FixedOffset::east_opt(0).expect("utc offset");

    c.bench_function("visible_matches", |b| {
        b.iter(|| {
            let rows = visible_entities(
                EntityKind::Matches,
                black_box(&store),
                black_box(&criteria),
                black_box(&selection),
                offset,
            );
            let page = paginate(&rows, 2, 10);
            black_box(page.total);
        })
    });
}

fn bench_suggestions(c: &mut Criterion) {
    let store = sample_store();
    c.bench_function("club_suggestions", |b| {
        b.iter(|| {
            let hits = suggestions(EntityKind::Clubs, black_box(&store), black_box("b 12"));
            black_box(hits.len());
        })
    });
}

criterion_group!(benches, bench_visible_matches, bench_suggestions);
criterion_main!(benches);
