use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::state::LifecycleState;
use crate::units::{self, AmountError, MinorUnits};

/// Local mirror of one contract-tracked artwork.
///
/// An empty record (`id == 0`) means no artwork is selected. Text fields use
/// `None` for "not yet set", which is distinct from an empty string.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ArtworkRecord {
    pub id: u64,
    pub owner: Address,
    pub origin_artist: Address,
    pub adopter: Address,
    pub shipper: Address,
    pub title: Option<String>,
    pub year: u32,
    pub medium: Option<String>,
    pub style: Option<String>,
    pub artist_name: Option<String>,
    pub artist_info: Option<String>,
    pub artist_location: Option<String>,
    pub notes: Option<String>,
    /// Listed price in major units.
    pub price: Decimal,
    pub state: LifecycleState,
}

impl ArtworkRecord {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.id == 0
    }

    /// Apply an owner+state refresh read back from the contract.
    pub fn apply_owner_and_state(&mut self, refresh: &OwnerAndState) {
        self.owner = refresh.owner;
        self.state = refresh.state;
    }

    /// Merge artwork and artist details into this record, replacing every
    /// contract-held field.
    pub fn apply_details(
        &mut self,
        id: u64,
        artwork: ArtworkDetails,
        artist: ArtistDetails,
    ) -> Result<(), AmountError> {
        let price = units::from_minor(artwork.price)?;
        self.id = id;
        self.owner = artwork.owner;
        self.title = non_empty(artwork.title);
        self.year = artwork.year;
        self.medium = non_empty(artwork.medium);
        self.style = non_empty(artwork.style);
        self.price = price;
        self.notes = non_empty(artwork.notes);
        self.state = artwork.state;
        self.adopter = artwork.adopter;
        self.shipper = artwork.shipper;
        self.origin_artist = artist.origin_artist;
        self.artist_name = non_empty(artist.name);
        self.artist_info = non_empty(artist.info);
        self.artist_location = non_empty(artist.location);
        Ok(())
    }
}

/// The contract stores unset text as an empty string.
fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

/// Metadata submitted when creating an artwork.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NewArtwork {
    pub title: Option<String>,
    pub year: u32,
    pub medium: Option<String>,
    pub style: Option<String>,
    pub artist_name: Option<String>,
    pub artist_info: Option<String>,
    pub artist_location: Option<String>,
    pub notes: Option<String>,
}

impl NewArtwork {
    /// Treat empty text the way the contract stores it: as unset.
    pub fn normalized(self) -> Self {
        let norm = |v: Option<String>| v.and_then(non_empty);
        NewArtwork {
            title: norm(self.title),
            year: self.year,
            medium: norm(self.medium),
            style: norm(self.style),
            artist_name: norm(self.artist_name),
            artist_info: norm(self.artist_info),
            artist_location: norm(self.artist_location),
            notes: norm(self.notes),
        }
    }

    /// Seed a record with the submitted metadata, before the contract's
    /// owner+state refresh is applied.
    pub fn into_record(self, id: u64, origin_artist: Address) -> ArtworkRecord {
        ArtworkRecord {
            id,
            origin_artist,
            title: self.title,
            year: self.year,
            medium: self.medium,
            style: self.style,
            artist_name: self.artist_name,
            artist_info: self.artist_info,
            artist_location: self.artist_location,
            notes: self.notes,
            ..ArtworkRecord::default()
        }
    }
}

/// Result of the contract's owner+state read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerAndState {
    pub owner: Address,
    pub state: LifecycleState,
}

/// Result of the contract's artwork-details read.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ArtworkDetails {
    pub exists: bool,
    pub owner: Address,
    pub title: String,
    pub year: u32,
    pub medium: String,
    pub style: String,
    pub price: MinorUnits,
    pub notes: String,
    pub state: LifecycleState,
    pub adopter: Address,
    pub shipper: Address,
}

/// Result of the contract's artist-details read.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ArtistDetails {
    pub origin_artist: Address,
    pub name: String,
    pub info: String,
    pub location: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_record_has_unset_fields() {
        let record = ArtworkRecord::empty();
        assert!(record.is_empty());
        assert!(record.owner.is_zero());
        assert!(record.origin_artist.is_zero());
        assert!(record.adopter.is_zero());
        assert!(record.shipper.is_zero());
        assert_eq!(record.title, None);
        assert_eq!(record.state, LifecycleState::Unknown);
    }

    #[test]
    fn details_merge_maps_empty_strings_to_unset() {
        let mut record = ArtworkRecord::empty();
        let artist = Address::from_bytes([1; 20]);
        record.apply_details(
            4,
            ArtworkDetails {
                exists: true,
                owner: artist,
                title: "Nocturne".into(),
                year: 1998,
                medium: "Oil".into(),
                style: String::new(),
                price: 1_500_000_000_000_000_000,
                notes: String::new(),
                state: LifecycleState::Framed,
                adopter: Address::ZERO,
                shipper: Address::ZERO,
            },
            ArtistDetails {
                origin_artist: artist,
                name: "R. Vale".into(),
                info: String::new(),
                location: "Lisbon".into(),
            },
        )
        .unwrap();
        assert_eq!(record.id, 4);
        assert_eq!(record.title.as_deref(), Some("Nocturne"));
        assert_eq!(record.style, None);
        assert_eq!(record.notes, None);
        assert_eq!(record.artist_info, None);
        assert_eq!(record.artist_location.as_deref(), Some("Lisbon"));
        assert_eq!(record.state, LifecycleState::Framed);
        assert_eq!(record.price, Decimal::new(15, 1));
    }

    #[test]
    fn normalized_drops_empty_text() {
        let spec = NewArtwork {
            title: Some("Untitled".into()),
            medium: Some(String::new()),
            ..NewArtwork::default()
        }
        .normalized();
        assert_eq!(spec.title.as_deref(), Some("Untitled"));
        assert_eq!(spec.medium, None);
    }

    #[test]
    fn new_artwork_seeds_record() {
        let artist = Address::from_bytes([9; 20]);
        let record = NewArtwork {
            title: Some("Dune".into()),
            year: 2001,
            ..NewArtwork::default()
        }
        .into_record(7, artist);
        assert_eq!(record.id, 7);
        assert_eq!(record.origin_artist, artist);
        assert_eq!(record.year, 2001);
        assert!(record.owner.is_zero());
    }
}
