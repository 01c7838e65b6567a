use std::collections::VecDeque;
use std::rc::Rc;

use chrono::{FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::catalog::{CatalogStore, Entity, EntityKind, kind_label};
use crate::clock::{Clock, SystemClock};
use crate::config::WidgetSettings;
use crate::error::{Result, WidgetError};
use crate::filter::{FilterCriteria, Page, paginate, visible_entities};
use crate::selection::SelectionSet;

const MAX_LOGS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WidgetVariant {
    SingleMatch,
    MatchList,
    StandingsTable,
}

impl WidgetVariant {
    pub fn next(self) -> Self {
        match self {
            WidgetVariant::SingleMatch => WidgetVariant::MatchList,
            WidgetVariant::MatchList => WidgetVariant::StandingsTable,
            WidgetVariant::StandingsTable => WidgetVariant::SingleMatch,
        }
    }

    /// Catalog tabs offered while this variant is active.
    pub fn tabs(self) -> &'static [EntityKind] {
        match self {
            WidgetVariant::SingleMatch | WidgetVariant::MatchList => &EntityKind::ALL,
            WidgetVariant::StandingsTable => &[EntityKind::Leagues, EntityKind::Clubs],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Lifecycle {
    Draft,
    Published,
    /// Taken down after having been live. Still editable and publishable again.
    Deleted,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerKind<T> {
    pub leagues: T,
    pub clubs: T,
    pub matches: T,
}

impl<T> PerKind<T> {
    pub fn get(&self, kind: EntityKind) -> &T {
        match kind {
            EntityKind::Leagues => &self.leagues,
            EntityKind::Clubs => &self.clubs,
            EntityKind::Matches => &self.matches,
        }
    }

    pub fn get_mut(&mut self, kind: EntityKind) -> &mut T {
        match kind {
            EntityKind::Leagues => &mut self.leagues,
            EntityKind::Clubs => &mut self.clubs,
            EntityKind::Matches => &mut self.matches,
        }
    }
}

pub type Scope = PerKind<Vec<String>>;

/// What a publish commits: filters are view state and are not part of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishedWidget {
    pub variant: WidgetVariant,
    pub scope: Scope,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    SetVariant(WidgetVariant),
    ToggleSelection { kind: EntityKind, key: String },
    SetFilterText { kind: EntityKind, text: String },
    SetFilterDate { kind: EntityKind, date: Option<NaiveDate> },
    SetFilterToday { kind: EntityKind },
    SetMatchLeagueFilter { text: String },
    SelectSuggestion { kind: EntityKind, value: String },
    ToggleIncludedOnly { kind: EntityKind },
    Publish,
    Delete,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WidgetSnapshot {
    pub variant: WidgetVariant,
    pub lifecycle: Lifecycle,
    pub dirty: bool,
    pub ever_published: bool,
    pub can_publish: bool,
    pub can_delete: bool,
    pub status: &'static str,
    pub tabs: Vec<EntityKind>,
    pub filters: PerKind<FilterCriteria>,
    pub selections: PerKind<SelectionSet>,
    pub scope: Scope,
    pub published: Option<PublishedWidget>,
}

#[derive(Debug, Clone)]
pub struct WidgetConfig {
    variant: WidgetVariant,
    selections: PerKind<SelectionSet>,
    filters: PerKind<FilterCriteria>,
    lifecycle: Lifecycle,
    dirty: bool,
    ever_published: bool,
    published: Option<PublishedWidget>,
    settings: WidgetSettings,
    clock: Rc<dyn Clock>,
    logs: VecDeque<String>,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl WidgetConfig {
    pub fn new() -> Self {
        Self::with_settings(WidgetSettings::default())
    }

    pub fn with_settings(settings: WidgetSettings) -> Self {
        let clock = SystemClock::new(settings.offset());
        Self::with_clock(settings, clock)
    }

    /// Kickoff dates are compared in `clock`'s offset; `today` also comes from it.
    pub fn with_clock(settings: WidgetSettings, clock: impl Clock + 'static) -> Self {
        Self {
            variant: WidgetVariant::SingleMatch,
            selections: PerKind::default(),
            filters: PerKind::default(),
            lifecycle: Lifecycle::Draft,
            dirty: false,
            ever_published: false,
            published: None,
            settings,
            clock: Rc::new(clock),
            logs: VecDeque::with_capacity(MAX_LOGS),
        }
    }

    pub fn variant(&self) -> WidgetVariant {
        self.variant
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn ever_published(&self) -> bool {
        self.ever_published
    }

    pub fn is_live(&self) -> bool {
        self.lifecycle == Lifecycle::Published
    }

    pub fn can_publish(&self) -> bool {
        self.dirty
    }

    pub fn can_delete(&self) -> bool {
        self.ever_published
    }

    pub fn filter(&self, kind: EntityKind) -> &FilterCriteria {
        self.filters.get(kind)
    }

    pub fn selection(&self, kind: EntityKind) -> &SelectionSet {
        self.selections.get(kind)
    }

    pub fn published(&self) -> Option<&PublishedWidget> {
        self.published.as_ref()
    }

    pub fn settings(&self) -> &WidgetSettings {
        &self.settings
    }

    pub fn logs(&self) -> &VecDeque<String> {
        &self.logs
    }

    pub fn offset(&self) -> FixedOffset {
        self.clock.offset()
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Applies one command. A failed precondition leaves the configuration untouched;
    /// only a `[WARN]` line is appended to the activity log.
    pub fn dispatch(&mut self, command: Command) -> Result<()> {
        match command {
            Command::SetVariant(variant) => {
                self.variant = variant;
                self.dirty = true;
                self.push_log(format!("[INFO] Variant: {}", variant_label(variant)));
            }
            Command::ToggleSelection { kind, key } => {
                let selection = self.selections.get_mut(kind);
                selection.toggle_in_place(&key);
                let state = if selection.is_selected(&key) {
                    "included"
                } else {
                    "excluded"
                };
                self.dirty = true;
                self.push_log(format!("[INFO] {} {key} {state}", kind_label(kind)));
            }
            Command::SetFilterText { kind, text }
            | Command::SelectSuggestion { kind, value: text } => {
                self.filters.get_mut(kind).text_query = text;
            }
            Command::SetFilterDate { kind, date } => {
                self.filters.get_mut(kind).date_exact = date;
            }
            Command::SetFilterToday { kind } => {
                let today = self.today();
                self.filters.get_mut(kind).date_exact = Some(today);
            }
            Command::SetMatchLeagueFilter { text } => {
                self.filters.matches.league_query = text;
            }
            Command::ToggleIncludedOnly { kind } => {
                let criteria = self.filters.get_mut(kind);
                criteria.included_only = !criteria.included_only;
                if self.settings.included_only_marks_dirty {
                    self.dirty = true;
                }
            }
            Command::Publish => self.publish()?,
            Command::Delete => self.delete_widget()?,
        }
        Ok(())
    }

    fn publish(&mut self) -> Result<()> {
        if !self.dirty {
            self.push_log("[WARN] Publish ignored: no unpublished changes");
            return Err(WidgetError::PreconditionNotMet("no unpublished changes"));
        }
        let payload = PublishedWidget {
            variant: self.variant,
            scope: self.scope(),
        };
        self.push_log(format!(
            "[INFO] Published {} ({} leagues, {} clubs, {} matches)",
            variant_label(payload.variant),
            payload.scope.leagues.len(),
            payload.scope.clubs.len(),
            payload.scope.matches.len()
        ));
        self.published = Some(payload);
        self.lifecycle = Lifecycle::Published;
        self.dirty = false;
        self.ever_published = true;
        Ok(())
    }

    fn delete_widget(&mut self) -> Result<()> {
        if !self.ever_published {
            self.push_log("[WARN] Delete ignored: widget was never published");
            return Err(WidgetError::PreconditionNotMet("widget was never published"));
        }
        self.lifecycle = Lifecycle::Deleted;
        self.dirty = true;
        self.push_log("[INFO] Widget taken down");
        Ok(())
    }

    /// Included keys per kind, stale keys included.
    pub fn scope(&self) -> Scope {
        Scope {
            leagues: self.selections.leagues.included_keys(),
            clubs: self.selections.clubs.included_keys(),
            matches: self.selections.matches.included_keys(),
        }
    }

    pub fn visible<'c>(&self, store: &'c CatalogStore, kind: EntityKind) -> Vec<&'c Entity> {
        visible_entities(
            kind,
            store,
            self.filters.get(kind),
            self.selections.get(kind),
            self.offset(),
        )
    }

    pub fn page<'c>(
        &self,
        store: &'c CatalogStore,
        kind: EntityKind,
        page: usize,
    ) -> Page<&'c Entity> {
        paginate(&self.visible(store, kind), page, self.settings.page_size)
    }

    pub fn snapshot(&self) -> WidgetSnapshot {
        WidgetSnapshot {
            variant: self.variant,
            lifecycle: self.lifecycle,
            dirty: self.dirty,
            ever_published: self.ever_published,
            can_publish: self.can_publish(),
            can_delete: self.can_delete(),
            status: status_label(self.is_live()),
            tabs: self.variant.tabs().to_vec(),
            filters: self.filters.clone(),
            selections: self.selections.clone(),
            scope: self.scope(),
            published: self.published.clone(),
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }
}

pub fn variant_label(variant: WidgetVariant) -> &'static str {
    match variant {
        WidgetVariant::SingleMatch => "Match",
        WidgetVariant::MatchList => "Matches",
        WidgetVariant::StandingsTable => "Table",
    }
}

pub fn lifecycle_label(lifecycle: Lifecycle) -> &'static str {
    match lifecycle {
        Lifecycle::Draft => "Draft",
        Lifecycle::Published => "Published",
        Lifecycle::Deleted => "Deleted",
    }
}

pub fn status_label(live: bool) -> &'static str {
    if live {
        "Widget published"
    } else {
        "Widget unpublished"
    }
}
