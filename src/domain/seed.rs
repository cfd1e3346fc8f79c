//! Default activity catalog seeded on first startup.

use super::ActivityEntry;

/// Returns the default set of activities used to seed an empty store.
#[must_use]
pub fn default_activities() -> Vec<ActivityEntry> {
    vec![
        ActivityEntry::new(
            "Chess Club",
            "Learn strategies and compete in chess tournaments",
            "Fridays, 3:30 PM - 5:00 PM",
            12,
        ),
        ActivityEntry::new(
            "Programming Class",
            "Learn programming fundamentals and build software projects",
            "Tuesdays and Thursdays, 3:30 PM - 4:30 PM",
            20,
        ),
        ActivityEntry::new(
            "Gym Class",
            "Physical education and sports activities",
            "Mondays, Wednesdays, Fridays, 2:00 PM - 3:00 PM",
            30,
        ),
        ActivityEntry::new(
            "Soccer Team",
            "Join the school soccer team and compete in matches",
            "Tuesdays and Thursdays, 4:00 PM - 5:30 PM",
            22,
        ),
        ActivityEntry::new(
            "Basketball Team",
            "Practice and play basketball with the school team",
            "Wednesdays and Fridays, 3:30 PM - 5:00 PM",
            15,
        ),
        ActivityEntry::new(
            "Art Club",
            "Explore your creativity through painting and drawing",
            "Thursdays, 3:30 PM - 5:00 PM",
            15,
        ),
        ActivityEntry::new(
            "Drama Club",
            "Act, direct, and produce plays and performances",
            "Mondays and Wednesdays, 4:00 PM - 5:30 PM",
            20,
        ),
        ActivityEntry::new(
            "Math Club",
            "Solve challenging problems and participate in math competitions",
            "Tuesdays, 3:30 PM - 4:30 PM",
            10,
        ),
        ActivityEntry::new(
            "Debate Team",
            "Develop public speaking and argumentation skills",
            "Fridays, 4:00 PM - 5:30 PM",
            12,
        ),
    ]
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn seed_names_are_unique() {
        let activities = default_activities();
        let names: HashSet<_> = activities.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names.len(), activities.len());
    }

    #[test]
    fn seed_capacities_are_positive() {
        for activity in default_activities() {
            assert!(activity.max_participants > 0, "{}", activity.name);
        }
    }

    #[test]
    fn chess_club_has_expected_capacity() {
        let activities = default_activities();
        let chess = activities.iter().find(|a| a.name == "Chess Club");
        let Some(chess) = chess else {
            panic!("Chess Club missing from seed");
        };
        assert_eq!(chess.max_participants, 12);
    }
}
