//! Publication status translation between the Kotatsu and Mihon vocabularies.
//!
//! Mihon's seven-value vocabulary is a strict superset of Kotatsu's (it adds
//! Licensed and splits Publishing from Ongoing), so Mihon's is used as the
//! canonical [`Status`] in the normalized model. The two directions are fixed
//! tables and are deliberately *not* inverses: several canonical states
//! collapse onto the same Kotatsu state because the Kotatsu vocabulary is
//! coarser. Unrecognized input never errors; it maps to each vocabulary's
//! default.

/// Canonical publication status (the Mihon vocabulary).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Status {
    #[default]
    Unknown,
    Ongoing,
    Completed,
    Licensed,
    Publishing,
    Cancelled,
    Hiatus,
}

impl Status {
    /// The integer code used in Mihon backup records.
    pub fn code(self) -> i32 {
        match self {
            Status::Unknown => 0,
            Status::Ongoing => 1,
            Status::Completed => 2,
            Status::Licensed => 3,
            Status::Publishing => 4,
            Status::Cancelled => 5,
            Status::Hiatus => 6,
        }
    }

    /// Decode a Mihon status code. Total: out-of-range codes are Unknown.
    pub fn from_code(code: i32) -> Self {
        match code {
            1 => Status::Ongoing,
            2 => Status::Completed,
            3 => Status::Licensed,
            4 => Status::Publishing,
            5 => Status::Cancelled,
            6 => Status::Hiatus,
            _ => Status::Unknown,
        }
    }

    /// Parse a Kotatsu state string. Total: unrecognized or absent input is
    /// Unknown. Matching is on uppercase tokens so the aliases older Kotatsu
    /// versions emitted (COMPLETED, CANCELLED, HIATUS, PUBLISHING) land on the
    /// same canonical state as their modern spellings.
    pub fn from_kotatsu(state: &str) -> Self {
        match state.trim().to_ascii_uppercase().as_str() {
            "ONGOING" => Status::Ongoing,
            "FINISHED" | "COMPLETED" => Status::Completed,
            "ABANDONED" | "CANCELLED" => Status::Cancelled,
            "PAUSED" | "HIATUS" => Status::Hiatus,
            "UPCOMING" | "PUBLISHING" => Status::Publishing,
            _ => Status::Unknown,
        }
    }

    /// The Kotatsu state string for this status.
    ///
    /// Licensed and Publishing have no Kotatsu counterpart and collapse to
    /// ONGOING, as does Unknown (Kotatsu has no unknown state).
    pub fn to_kotatsu(self) -> &'static str {
        match self {
            Status::Ongoing => "ONGOING",
            Status::Completed => "FINISHED",
            Status::Licensed => "ONGOING",
            Status::Publishing => "ONGOING",
            Status::Cancelled => "ABANDONED",
            Status::Hiatus => "PAUSED",
            Status::Unknown => "ONGOING",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_round_trip() {
        for code in 0..=6 {
            assert_eq!(Status::from_code(code).code(), code);
        }
    }

    #[test]
    fn test_from_code_is_total() {
        assert_eq!(Status::from_code(-1), Status::Unknown);
        assert_eq!(Status::from_code(7), Status::Unknown);
        assert_eq!(Status::from_code(i32::MAX), Status::Unknown);
    }

    #[test]
    fn test_kotatsu_aliases() {
        assert_eq!(Status::from_kotatsu("ONGOING"), Status::Ongoing);
        assert_eq!(Status::from_kotatsu("finished"), Status::Completed);
        assert_eq!(Status::from_kotatsu("COMPLETED"), Status::Completed);
        assert_eq!(Status::from_kotatsu("ABANDONED"), Status::Cancelled);
        assert_eq!(Status::from_kotatsu("CANCELLED"), Status::Cancelled);
        assert_eq!(Status::from_kotatsu(" PAUSED "), Status::Hiatus);
        assert_eq!(Status::from_kotatsu("UPCOMING"), Status::Publishing);
        assert_eq!(Status::from_kotatsu(""), Status::Unknown);
        assert_eq!(Status::from_kotatsu("whatever"), Status::Unknown);
    }

    #[test]
    fn test_directions_are_not_inverses() {
        // UPCOMING -> Publishing -> ONGOING: the coarser Kotatsu vocabulary
        // loses the distinction on the way back.
        let forward = Status::from_kotatsu("UPCOMING");
        assert_eq!(forward, Status::Publishing);
        assert_eq!(forward.to_kotatsu(), "ONGOING");

        assert_eq!(Status::Licensed.to_kotatsu(), "ONGOING");
        assert_eq!(Status::Unknown.to_kotatsu(), "ONGOING");
    }

    #[test]
    fn test_to_kotatsu_is_total() {
        for code in 0..=6 {
            assert!(!Status::from_code(code).to_kotatsu().is_empty());
        }
    }
}
