//! Logical addressing for the pet registry.
//!
//! # Responsibility
//! - Parse addresses into the closed [`PetAddress`] union.
//! - Render canonical address text and report content kinds.
//!
//! # Invariants
//! - Exactly two shapes resolve: the bare collection path and the
//!   collection path with one trailing decimal id. Everything else is an
//!   [`AddressParseError`].
//! - Item ids are unsigned decimal digit runs that fit in `i64`.

use crate::model::pet::PetId;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Authority segment every pet address starts with.
pub const AUTHORITY: &str = "petshelf.pets";

/// Path segment naming the pet collection.
pub const PETS_PATH: &str = "pets";

/// Resolved target scope of a store operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PetAddress {
    /// The whole `pets` table.
    Collection,
    /// One pet row by storage id.
    Item(PetId),
}

impl PetAddress {
    /// Collection address constant.
    pub fn collection() -> Self {
        Self::Collection
    }

    /// Item address for a known id.
    pub fn item(id: PetId) -> Self {
        Self::Item(id)
    }

    /// Parses address text into a scope.
    ///
    /// Accepted shapes are `petshelf.pets/pets` and
    /// `petshelf.pets/pets/{id}` with `{id}` an all-digit decimal.
    pub fn parse(input: &str) -> Result<Self, AddressParseError> {
        let mut segments = input.split('/');

        let authority = segments.next().unwrap_or_default();
        let path = segments.next();
        if authority != AUTHORITY || path != Some(PETS_PATH) {
            return Err(AddressParseError::new(input));
        }

        match (segments.next(), segments.next()) {
            (None, _) => Ok(Self::Collection),
            (Some(id_segment), None) => parse_item_id(id_segment)
                .map(Self::Item)
                .ok_or_else(|| AddressParseError::new(input)),
            // More than three segments never resolves.
            (Some(_), Some(_)) => Err(AddressParseError::new(input)),
        }
    }

    /// Content kind reported for this address.
    pub fn content_kind(&self) -> ContentKind {
        match self {
            Self::Collection => ContentKind::PetList,
            Self::Item(_) => ContentKind::PetItem,
        }
    }
}

impl Display for PetAddress {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Collection => write!(f, "{AUTHORITY}/{PETS_PATH}"),
            Self::Item(id) => write!(f, "{AUTHORITY}/{PETS_PATH}/{id}"),
        }
    }
}

fn parse_item_id(segment: &str) -> Option<PetId> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    // Digit-only input: parse can only fail on i64 overflow.
    segment.parse::<PetId>().ok()
}

/// Content kind labels for the two address shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    PetList,
    PetItem,
}

impl ContentKind {
    /// Stable vnd-style label for collaborators that negotiate by kind.
    pub fn as_label(&self) -> &'static str {
        match self {
            Self::PetList => "vnd.petshelf.dir/pets",
            Self::PetItem => "vnd.petshelf.item/pets",
        }
    }
}

impl Display for ContentKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_label())
    }
}

/// Address text that resolves to neither known shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressParseError {
    input: String,
}

impl AddressParseError {
    fn new(input: &str) -> Self {
        Self {
            input: input.to_string(),
        }
    }

    /// The rejected address text.
    pub fn input(&self) -> &str {
        &self.input
    }
}

impl Display for AddressParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "address `{}` matches neither the pet collection nor a single pet",
            self.input
        )
    }
}

impl Error for AddressParseError {}

#[cfg(test)]
mod tests {
    use super::{AddressParseError, ContentKind, PetAddress};

    #[test]
    fn parses_the_two_known_shapes() {
        assert_eq!(
            PetAddress::parse("petshelf.pets/pets"),
            Ok(PetAddress::Collection)
        );
        assert_eq!(
            PetAddress::parse("petshelf.pets/pets/42"),
            Ok(PetAddress::Item(42))
        );
        assert_eq!(PetAddress::parse("petshelf.pets/pets/0"), Ok(PetAddress::Item(0)));
    }

    #[test]
    fn display_round_trips_through_parse() {
        for address in [PetAddress::Collection, PetAddress::Item(7)] {
            assert_eq!(PetAddress::parse(&address.to_string()), Ok(address));
        }
    }

    #[test]
    fn rejects_everything_else() {
        for input in [
            "",
            "pets",
            "petshelf.pets",
            "petshelf.pets/cats",
            "other.authority/pets",
            "petshelf.pets/pets/",
            "petshelf.pets/pets/-3",
            "petshelf.pets/pets/+3",
            "petshelf.pets/pets/12abc",
            "petshelf.pets/pets/1/extra",
            "petshelf.pets/pets/99999999999999999999",
        ] {
            let err = PetAddress::parse(input).unwrap_err();
            assert_eq!(err, AddressParseError::new(input), "input: {input}");
            assert!(err.to_string().contains(input));
        }
    }

    #[test]
    fn content_kinds_follow_scope() {
        assert_eq!(
            PetAddress::Collection.content_kind(),
            ContentKind::PetList
        );
        assert_eq!(PetAddress::Item(5).content_kind(), ContentKind::PetItem);
        assert_eq!(ContentKind::PetList.as_label(), "vnd.petshelf.dir/pets");
        assert_eq!(ContentKind::PetItem.as_label(), "vnd.petshelf.item/pets");
    }
}
