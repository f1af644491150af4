//! The six suspects.

use std::fmt;
use std::str::FromStr;

use crate::{BoardError, Space};

/// A suspect token. At most one player per room may hold each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Character {
    MissScarlet,
    ColonelMustard,
    MrsWhite,
    MrGreen,
    MrsPeacock,
    ProfessorPlum,
}

impl Character {
    pub const ALL: [Character; 6] = [
        Character::MissScarlet,
        Character::ColonelMustard,
        Character::MrsWhite,
        Character::MrGreen,
        Character::MrsPeacock,
        Character::ProfessorPlum,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Character::MissScarlet => "Miss Scarlet",
            Character::ColonelMustard => "Colonel Mustard",
            Character::MrsWhite => "Mrs. White",
            Character::MrGreen => "Mr. Green",
            Character::MrsPeacock => "Mrs. Peacock",
            Character::ProfessorPlum => "Professor Plum",
        }
    }

    /// The hallway this suspect's token is placed on when chosen. A
    /// player's first move must leave from here.
    pub fn starting_space(self) -> Space {
        match self {
            Character::MissScarlet => Space::H2,
            Character::ColonelMustard => Space::H5,
            Character::MrsWhite => Space::H12,
            Character::MrGreen => Space::H11,
            Character::MrsPeacock => Space::H8,
            Character::ProfessorPlum => Space::H3,
        }
    }
}

impl fmt::Display for Character {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Character {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Character::ALL
            .into_iter()
            .find(|c| c.name() == s)
            .ok_or_else(|| BoardError::UnknownCharacter(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_parse_display_names() {
        assert_eq!(
            "Miss Scarlet".parse::<Character>().unwrap(),
            Character::MissScarlet
        );
        assert_eq!(
            "Professor Plum".parse::<Character>().unwrap(),
            Character::ProfessorPlum
        );
        assert_eq!(
            "Detective".parse::<Character>(),
            Err(BoardError::UnknownCharacter("Detective".into()))
        );
    }

    #[test]
    fn test_starting_spaces_are_distinct_hallways() {
        let starts: HashSet<Space> =
            Character::ALL.iter().map(|c| c.starting_space()).collect();
        assert_eq!(starts.len(), Character::ALL.len());
        assert!(starts.iter().all(|s| s.is_hallway()));
    }

    #[test]
    fn test_miss_scarlet_starts_between_hall_and_lounge() {
        assert_eq!(Character::MissScarlet.starting_space(), Space::H2);
    }
}
