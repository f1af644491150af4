//! Board spaces and their occupancy class.

use std::fmt;
use std::str::FromStr;

use crate::BoardError;

/// Occupancy class of a space.
///
/// Hallways hold at most one token; rooms hold any number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpaceKind {
    Room,
    Hallway,
}

/// One of the 21 spaces on the board: nine rooms and twelve hallways.
///
/// Hallways are numbered left-to-right, top-to-bottom over the 3x3 room
/// grid:
///
/// ```text
/// Study        H1  Hall      H2  Lounge
/// H3               H4            H5
/// Library      H6  Billiard  H7  Dining Room
/// H8               H9            H10
/// Conservatory H11 Ballroom  H12 Kitchen
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Space {
    Study,
    Hall,
    Lounge,
    Library,
    BilliardRoom,
    DiningRoom,
    Conservatory,
    Ballroom,
    Kitchen,
    H1,
    H2,
    H3,
    H4,
    H5,
    H6,
    H7,
    H8,
    H9,
    H10,
    H11,
    H12,
}

impl Space {
    /// Every space, rooms first.
    pub const ALL: [Space; 21] = [
        Space::Study,
        Space::Hall,
        Space::Lounge,
        Space::Library,
        Space::BilliardRoom,
        Space::DiningRoom,
        Space::Conservatory,
        Space::Ballroom,
        Space::Kitchen,
        Space::H1,
        Space::H2,
        Space::H3,
        Space::H4,
        Space::H5,
        Space::H6,
        Space::H7,
        Space::H8,
        Space::H9,
        Space::H10,
        Space::H11,
        Space::H12,
    ];

    /// The name clients send and receive.
    pub fn name(self) -> &'static str {
        match self {
            Space::Study => "Study",
            Space::Hall => "Hall",
            Space::Lounge => "Lounge",
            Space::Library => "Library",
            Space::BilliardRoom => "Billiard Room",
            Space::DiningRoom => "Dining Room",
            Space::Conservatory => "Conservatory",
            Space::Ballroom => "Ballroom",
            Space::Kitchen => "Kitchen",
            Space::H1 => "H1",
            Space::H2 => "H2",
            Space::H3 => "H3",
            Space::H4 => "H4",
            Space::H5 => "H5",
            Space::H6 => "H6",
            Space::H7 => "H7",
            Space::H8 => "H8",
            Space::H9 => "H9",
            Space::H10 => "H10",
            Space::H11 => "H11",
            Space::H12 => "H12",
        }
    }

    pub fn kind(self) -> SpaceKind {
        match self {
            Space::Study
            | Space::Hall
            | Space::Lounge
            | Space::Library
            | Space::BilliardRoom
            | Space::DiningRoom
            | Space::Conservatory
            | Space::Ballroom
            | Space::Kitchen => SpaceKind::Room,
            _ => SpaceKind::Hallway,
        }
    }

    pub fn is_hallway(self) -> bool {
        self.kind() == SpaceKind::Hallway
    }
}

impl fmt::Display for Space {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Space {
    type Err = BoardError;

    /// Parses the exact display name. Hallways also accept the long form
    /// `Hallway<n>` older clients send.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = match s.strip_prefix("Hallway") {
            Some(n) if !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()) => {
                format!("H{n}")
            }
            _ => s.to_string(),
        };
        Space::ALL
            .into_iter()
            .find(|space| space.name() == name)
            .ok_or_else(|| BoardError::UnknownSpace(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip_through_from_str() {
        for space in Space::ALL {
            assert_eq!(space.name().parse::<Space>().unwrap(), space);
        }
    }

    #[test]
    fn test_hall_is_a_room_not_a_hallway() {
        // "Hall" shares a prefix with the hallway names.
        assert_eq!(Space::Hall.kind(), SpaceKind::Room);
        assert!(Space::H1.is_hallway());
        assert_eq!(Space::ALL.iter().filter(|s| s.is_hallway()).count(), 12);
    }

    #[test]
    fn test_long_hallway_names_are_accepted() {
        assert_eq!("Hallway1".parse::<Space>().unwrap(), Space::H1);
        assert_eq!("Hallway12".parse::<Space>().unwrap(), Space::H12);
    }

    #[test]
    fn test_unknown_names_are_rejected() {
        assert_eq!(
            "Attic".parse::<Space>(),
            Err(BoardError::UnknownSpace("Attic".into()))
        );
        assert!("H13".parse::<Space>().is_err());
        assert!("Hallway".parse::<Space>().is_err());
        assert!("lounge".parse::<Space>().is_err());
    }
}
