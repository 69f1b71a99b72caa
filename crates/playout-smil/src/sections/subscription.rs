use playout_common::Player;

use super::{row, xml_escape, SectionPreparer, SectionRow};

/// Endpoints a device is told to contact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionTargets {
    index_url: String,
    report_server: String,
}

impl SubscriptionTargets {
    pub fn new(index_url: impl Into<String>, report_server: impl Into<String>) -> Self {
        Self {
            index_url: index_url.into(),
            report_server: report_server.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn index_url(&self) -> &str {
        &self.index_url
    }

    fn report_url(&self, kind: &str, uuid: &str) -> String {
        format!("{}/{}/{}", self.report_server, kind, uuid)
    }
}

/// Task schedule and telemetry subscriptions, in fixed order.
pub struct SubscriptionPreparer<'a> {
    player: &'a Player,
    targets: &'a SubscriptionTargets,
}

impl<'a> SubscriptionPreparer<'a> {
    pub fn new(player: &'a Player, targets: &'a SubscriptionTargets) -> Self {
        Self { player, targets }
    }

    fn report(&self, kind: &str, path: &str) -> SectionRow {
        subscription(
            kind,
            &self.targets.report_url(path, &self.player.uuid),
            "put",
        )
    }
}

impl SectionPreparer for SubscriptionPreparer<'_> {
    fn prepare(&self) -> Vec<SectionRow> {
        let mut rows = Vec::new();

        if !self.player.commands.is_empty() {
            rows.push(subscription("TaskSchedule", self.targets.index_url(), "get"));
        }

        let flags = &self.player.reports;
        let reports = [
            (flags.inventory, "InventoryReport", "inventory"),
            (flags.played_durations, "PlaylogCollection", "playlog"),
            (flags.event_logs, "EventlogCollection", "eventlog"),
            (flags.configuration, "Configuration", "configuration"),
            (flags.executions, "TaskExecutionReport", "execution"),
        ];
        rows.extend(
            reports
                .into_iter()
                .filter(|(enabled, _, _)| *enabled)
                .map(|(_, kind, path)| self.report(kind, path)),
        );

        rows
    }
}

fn subscription(kind: &str, action: &str, method: &str) -> SectionRow {
    row([
        ("type", kind.to_string()),
        ("action", xml_escape(action)),
        ("method", method.to_string()),
    ])
}
