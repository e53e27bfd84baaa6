use chrono::{
    DateTime,
    Utc,
};
use serde::{
    Deserialize,
    Serialize,
};

use crate::core::{
    utils::days_between,
    Profile,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StreakStatus {
    /// Something was done today.
    Completed,
    /// Last activity was yesterday. The streak survives if the learner acts today.
    Pending,
    Broken,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakDisplay {
    pub streak: u32,
    pub status: StreakStatus,
}

/// Streak as it should be shown right now. The stored counter is never written back here;
/// a broken streak only displays as zero until the backend resets it on the next activity.
pub fn display_streak(
    last_activity_date: Option<DateTime<Utc>>,
    current_streak: u32,
    now: DateTime<Utc>,
) -> StreakDisplay {
    let Some(last) = last_activity_date else {
        return StreakDisplay { streak: current_streak, status: StreakStatus::Completed };
    };

    match days_between(last, now) {
        diff if diff < 0 => {
            tracing::warn!(
                last_activity = %last,
                now = %now,
                "last activity is in the future, check the clock or stored profile"
            );
            StreakDisplay { streak: current_streak, status: StreakStatus::Completed }
        }
        0 => StreakDisplay { streak: current_streak, status: StreakStatus::Completed },
        1 => StreakDisplay { streak: current_streak, status: StreakStatus::Pending },
        _ => StreakDisplay { streak: 0, status: StreakStatus::Broken },
    }
}

impl Profile {
    pub fn display_streak(&self, now: DateTime<Utc>) -> StreakDisplay {
        display_streak(self.last_activity_date, self.current_streak, now)
    }
}
