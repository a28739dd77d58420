use crate::domain::models::program::Program;
use crate::domain::services::capacity;
use std::collections::{HashMap, HashSet};

/// Half-open interval overlap: touching endpoints do not conflict.
pub fn overlaps(a: &Program, b: &Program) -> bool {
    a.start_time < b.end_time && b.start_time < a.end_time
}

/// Two programs exclude each other when their intervals overlap or their
/// blocks share an exclusion group. `exclusions` maps block id to the block
/// ids it is grouped with.
pub fn mutually_excludes(
    a: &Program,
    b: &Program,
    exclusions: &HashMap<String, HashSet<String>>,
) -> bool {
    overlaps(a, b)
        || exclusions
            .get(&a.block_id)
            .is_some_and(|blocked| blocked.contains(&b.block_id))
}

/// Every other program that attendance of `program` would block for a user.
pub fn compute_blocked_set(
    program: &Program,
    all_programs: &[Program],
    exclusions: &HashMap<String, HashSet<String>>,
) -> HashSet<String> {
    all_programs
        .iter()
        .filter(|p| p.id != program.id)
        .filter(|p| mutually_excludes(program, p, exclusions))
        .map(|p| p.id.clone())
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgramColor {
    Attends,
    Blocked,
    Mandatory,
    Voluntary,
}

impl ProgramColor {
    pub fn hex(self) -> &'static str {
        match self {
            ProgramColor::Attends => "#27A243",
            ProgramColor::Blocked => "#6C757D",
            ProgramColor::Mandatory => "#D53343",
            ProgramColor::Voluntary => "#0077F7",
        }
    }
}

/// Inputs for the per-program display-state derivation.
pub struct DisplayContext {
    pub user_attends: bool,
    pub blocked: bool,
    pub attendees_count: i64,
    pub capacity: Option<i64>,
    pub mandatory: bool,
    pub user_allowed: bool,
    pub paid: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayState {
    pub user_attends: bool,
    pub blocked: bool,
    pub occupied: bool,
    pub color: ProgramColor,
}

/// The color is a strict priority chain; the first matching rule wins.
/// Attendance outranks everything, then any condition that prevents
/// registration, then the mandatory flag, then voluntary.
pub fn derive_display_state(ctx: &DisplayContext) -> DisplayState {
    let occupied = capacity::is_full(ctx.capacity, ctx.attendees_count);
    let registerable = ctx.user_allowed && !occupied && !ctx.blocked && ctx.paid;

    let color = if ctx.user_attends {
        ProgramColor::Attends
    } else if !registerable {
        ProgramColor::Blocked
    } else if ctx.mandatory {
        ProgramColor::Mandatory
    } else {
        ProgramColor::Voluntary
    };

    DisplayState {
        user_attends: ctx.user_attends,
        blocked: ctx.blocked,
        occupied,
        color,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn program(id: &str, block_id: &str, start_h: u32, start_m: u32, end_h: u32, end_m: u32) -> Program {
        Program {
            id: id.to_string(),
            block_id: block_id.to_string(),
            room_id: None,
            start_time: Utc.with_ymd_and_hms(2024, 7, 1, start_h, start_m, 0).unwrap(),
            end_time: Utc.with_ymd_and_hms(2024, 7, 1, end_h, end_m, 0).unwrap(),
            created_at: Utc::now(),
        }
    }

    fn ctx(user_attends: bool, blocked: bool, occupied_count: i64, capacity: Option<i64>, mandatory: bool) -> DisplayContext {
        DisplayContext {
            user_attends,
            blocked,
            attendees_count: occupied_count,
            capacity,
            mandatory,
            user_allowed: true,
            paid: true,
        }
    }

    #[test]
    fn overlapping_intervals_block_each_other() {
        let a = program("a", "b1", 9, 0, 10, 0);
        let b = program("b", "b2", 9, 30, 10, 30);
        assert!(overlaps(&a, &b));
        assert!(overlaps(&b, &a));
    }

    #[test]
    fn touching_endpoints_do_not_overlap() {
        let a = program("a", "b1", 9, 0, 10, 0);
        let b = program("b", "b2", 10, 0, 11, 0);
        assert!(!overlaps(&a, &b));
        assert!(!overlaps(&b, &a));
    }

    #[test]
    fn blocked_set_excludes_the_program_itself() {
        let a = program("a", "b1", 9, 0, 10, 0);
        let b = program("b", "b2", 9, 30, 10, 30);
        let c = program("c", "b3", 10, 0, 11, 0);
        let all = vec![a.clone(), b, c];

        let blocked = compute_blocked_set(&a, &all, &HashMap::new());
        assert_eq!(blocked, HashSet::from(["b".to_string()]));
    }

    #[test]
    fn exclusion_group_blocks_without_overlap() {
        let a = program("a", "b1", 9, 0, 10, 0);
        let b = program("b", "b2", 14, 0, 15, 0);
        let all = vec![a.clone(), b];

        let mut exclusions = HashMap::new();
        exclusions.insert("b1".to_string(), HashSet::from(["b2".to_string()]));
        exclusions.insert("b2".to_string(), HashSet::from(["b1".to_string()]));

        let blocked = compute_blocked_set(&a, &all, &exclusions);
        assert_eq!(blocked, HashSet::from(["b".to_string()]));
    }

    #[test]
    fn attending_wins_over_everything() {
        let state = derive_display_state(&ctx(true, true, 5, Some(5), true));
        assert_eq!(state.color, ProgramColor::Attends);
    }

    #[test]
    fn occupied_outranks_mandatory() {
        // Not attending, program full, block mandatory: occupied wins.
        let state = derive_display_state(&ctx(false, false, 5, Some(5), true));
        assert!(state.occupied);
        assert_eq!(state.color, ProgramColor::Blocked);
    }

    #[test]
    fn blocked_flag_yields_blocked_color() {
        let state = derive_display_state(&ctx(false, true, 0, Some(5), false));
        assert_eq!(state.color, ProgramColor::Blocked);
    }

    #[test]
    fn unpaid_user_sees_blocked() {
        let state = derive_display_state(&DisplayContext {
            paid: false,
            ..ctx(false, false, 0, None, false)
        });
        assert_eq!(state.color, ProgramColor::Blocked);
    }

    #[test]
    fn mandatory_before_voluntary() {
        assert_eq!(
            derive_display_state(&ctx(false, false, 0, Some(5), true)).color,
            ProgramColor::Mandatory
        );
        assert_eq!(
            derive_display_state(&ctx(false, false, 0, Some(5), false)).color,
            ProgramColor::Voluntary
        );
    }

    #[test]
    fn colors_match_the_calendar_palette() {
        assert_eq!(ProgramColor::Attends.hex(), "#27A243");
        assert_eq!(ProgramColor::Blocked.hex(), "#6C757D");
        assert_eq!(ProgramColor::Mandatory.hex(), "#D53343");
        assert_eq!(ProgramColor::Voluntary.hex(), "#0077F7");
    }

    #[test]
    fn unlimited_capacity_is_never_occupied() {
        let state = derive_display_state(&ctx(false, false, 100, None, false));
        assert!(!state.occupied);
        assert_eq!(state.color, ProgramColor::Voluntary);
    }
}
