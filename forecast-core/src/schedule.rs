//! Trigger selection and the resident scheduling loop.

use std::str::FromStr;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Something the scheduler can fire. Cycles report their own failures.
#[async_trait]
pub trait Cycle: Send + Sync {
    async fn run_cycle(&self);
}

#[derive(Debug, Clone)]
pub enum Trigger {
    /// One cycle at startup, then the scheduler returns.
    Once,
    /// A cycle on every firing of the expression, forever.
    Cron {
        expression: String,
        schedule: cron::Schedule,
    },
}

impl Trigger {
    /// A missing or blank expression selects one-shot mode.
    pub fn from_config(expression: Option<&str>) -> Result<Self> {
        match expression.map(str::trim) {
            None | Some("") => Ok(Trigger::Once),
            Some(expr) => {
                let schedule = cron::Schedule::from_str(&normalize_cron_expr(expr))
                    .map_err(|e| anyhow!("Invalid cron expression '{expr}': {e}"))?;
                Ok(Trigger::Cron {
                    expression: expr.to_string(),
                    schedule,
                })
            }
        }
    }

    pub fn is_recurring(&self) -> bool {
        matches!(self, Trigger::Cron { .. })
    }

    pub fn next_fire_after(&self, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
        match self {
            Trigger::Once => None,
            Trigger::Cron { schedule, .. } => schedule.after(&after).next(),
        }
    }
}

/// The `cron` crate wants a leading seconds field and numbers weekdays
/// 1-7 from Sunday. Classic 5-field expressions fire at second zero and use
/// 0-7 with both 0 and 7 meaning Sunday.
fn normalize_cron_expr(expr: &str) -> String {
    let trimmed = expr.trim();
    let fields: Vec<&str> = trimmed.split_whitespace().collect();
    if fields.len() == 5 {
        format!(
            "0 {} {} {} {} {}",
            fields[0],
            fields[1],
            fields[2],
            fields[3],
            shift_days_of_week(fields[4])
        )
    } else {
        trimmed.to_string()
    }
}

/// Rewrite a classic day-of-week field into the `cron` crate's numbering.
///
/// Numeric items, ranges and steps are expanded to an explicit list; names
/// (`MON-FRI`) and a bare `*` are left alone.
fn shift_days_of_week(field: &str) -> String {
    if field == "*" {
        return field.to_string();
    }

    let mut days = Vec::new();
    for item in field.split(',') {
        match classic_days(item) {
            Some(classic) => days.extend(classic.into_iter().map(|d| (d % 7) + 1)),
            None => return field.to_string(),
        }
    }

    days.sort_unstable();
    days.dedup();
    days.iter().map(u32::to_string).collect::<Vec<_>>().join(",")
}

/// Days named by one list item in classic 0-7 numbering.
fn classic_days(item: &str) -> Option<Vec<u32>> {
    let (base, step) = match item.split_once('/') {
        Some((base, step)) => (base, step.parse::<u32>().ok().filter(|s| *s > 0)?),
        None => (item, 1),
    };

    let (start, end) = match base {
        "*" => (0, 6),
        _ => match base.split_once('-') {
            Some((a, b)) => (a.parse::<u32>().ok()?, b.parse::<u32>().ok()?),
            None => {
                let day = base.parse::<u32>().ok()?;
                if item.contains('/') { (day, 7) } else { (day, day) }
            }
        },
    };

    if start > end || end > 7 {
        return None;
    }

    Some((start..=end).step_by(step as usize).collect())
}

/// Drive `cycle` according to `trigger`.
///
/// Cycles never overlap: the next fire time is computed only after the
/// previous cycle has finished.
pub async fn run<C: Cycle + ?Sized>(trigger: &Trigger, cycle: &C) {
    match trigger {
        Trigger::Once => cycle.run_cycle().await,
        Trigger::Cron { expression, .. } => loop {
            let now = Utc::now();
            let Some(next) = trigger.next_fire_after(now) else {
                log::warn!("cron expression '{expression}' has no upcoming fire time");
                return;
            };

            log::debug!("next cycle at {next}");
            let wait = (next - now).to_std().unwrap_or_default();
            tokio::time::sleep(wait).await;

            cycle.run_cycle().await;
        },
    }
}
