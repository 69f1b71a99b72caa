//! Weekly standby schedule as recurring wallclock intervals.
//!
//! The configured schedule lists on-periods per ISO weekday. Devices are told
//! the complement: each row is one off-period that recurs every week,
//! expressed as `wallclock(R/<anchor>+w<weekday>T<time>/P1W)` where the anchor
//! is the date one month before compilation.

use chrono::{Months, NaiveDate};
use playout_common::{Player, ScreenPeriod};

use super::{row, SectionPreparer, SectionRow};

const MINUTES_PER_DAY: u32 = 24 * 60;

pub struct ScreenTimesPreparer<'a> {
    player: &'a Player,
    today: NaiveDate,
}

impl<'a> ScreenTimesPreparer<'a> {
    pub fn new(player: &'a Player, today: NaiveDate) -> Self {
        Self { player, today }
    }

    fn anchor(&self) -> String {
        self.today
            .checked_sub_months(Months::new(1))
            .unwrap_or(self.today)
            .format("%Y-%m-%d")
            .to_string()
    }

    fn on_periods(&self, day: u8) -> Vec<(u32, u32)> {
        let mut periods: Vec<(u32, u32)> = self
            .player
            .screen_times
            .iter()
            .filter(|entry| entry.day == day)
            .flat_map(|entry| entry.periods.iter())
            .filter_map(|period| match parse_period(period) {
                Some(span) => Some(span),
                None => {
                    tracing::warn!(
                        uuid = %self.player.uuid,
                        start = %period.start,
                        end = %period.end,
                        "Ignoring invalid screen time period"
                    );
                    None
                }
            })
            .collect();
        periods.sort_unstable();
        periods
    }
}

impl SectionPreparer for ScreenTimesPreparer<'_> {
    fn prepare(&self) -> Vec<SectionRow> {
        if !self.player.model.supports_standby() || self.player.screen_times.is_empty() {
            return Vec::new();
        }

        for entry in &self.player.screen_times {
            if !(1..=7).contains(&entry.day) {
                tracing::warn!(uuid = %self.player.uuid, day = entry.day, "Ignoring invalid screen time day");
            }
        }

        let anchor = self.anchor();
        let mut rows = Vec::new();
        for day in 1..=7u8 {
            let token = weekday_token(day);
            for (start, end) in off_periods(&self.on_periods(day)) {
                rows.push(row([
                    ("begin", wallclock(&anchor, token, start)),
                    ("end", wallclock(&anchor, token, end)),
                ]));
            }
        }
        rows
    }
}

/// SMIL weekday token for an ISO weekday: Sunday is `0`.
fn weekday_token(iso_day: u8) -> u8 {
    iso_day % 7
}

/// Gaps between sorted, possibly overlapping on-periods within one day.
fn off_periods(on: &[(u32, u32)]) -> Vec<(u32, u32)> {
    let mut off = Vec::new();
    let mut cursor = 0;
    for &(start, end) in on {
        if start > cursor {
            off.push((cursor, start));
        }
        cursor = cursor.max(end);
    }
    if cursor < MINUTES_PER_DAY {
        off.push((cursor, MINUTES_PER_DAY));
    }
    off
}

fn wallclock(anchor: &str, weekday: u8, minutes: u32) -> String {
    format!("wallclock(R/{}+w{}T{}/P1W)", anchor, weekday, clock(minutes))
}

fn clock(minutes: u32) -> String {
    if minutes >= MINUTES_PER_DAY {
        return "23:59:59".to_string();
    }
    format!("{:02}:{:02}:00", minutes / 60, minutes % 60)
}

fn parse_period(period: &ScreenPeriod) -> Option<(u32, u32)> {
    let start = parse_clock(&period.start)?;
    let end = parse_clock(&period.end)?;
    (start < end).then_some((start, end))
}

fn parse_clock(value: &str) -> Option<u32> {
    let (hours, minutes) = value.trim().split_once(':')?;
    let hours: u32 = hours.parse().ok()?;
    let minutes: u32 = minutes.parse().ok()?;
    if hours > 24 || minutes >= 60 {
        return None;
    }
    let total = hours * 60 + minutes;
    (total <= MINUTES_PER_DAY).then_some(total)
}
