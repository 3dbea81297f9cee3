//! Service catalog and price picker.
//!
//! Every option belongs to a price tier; selecting an option adds its tier
//! price to the running total.

use rust_decimal::Decimal;
use thiserror::Error;

/// How long the studio takes to deliver a first draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Turnaround {
    Hours24,
    Hours48,
}

impl std::fmt::Display for Turnaround {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Turnaround::Hours24 => write!(f, "24hr"),
            Turnaround::Hours48 => write!(f, "48hr"),
        }
    }
}

/// A price tier and the services it covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceTier {
    /// Price in rupees.
    pub price: u32,
    pub options: &'static [&'static str],
    pub turnaround: Turnaround,
}

pub const CATALOG: &[ServiceTier] = &[
    ServiceTier {
        price: 199,
        options: &[
            "Social Media Designs",
            "Business Card",
            "Envelope",
            "Letterhead",
            "E Card Invitation",
        ],
        turnaround: Turnaround::Hours24,
    },
    ServiceTier {
        price: 999,
        options: &[
            "Flyer",
            "Poster",
            "Daily Calendar",
            "Diary / Magazine / Book Cover",
            "Product Label",
            "Invitation",
        ],
        turnaround: Turnaround::Hours24,
    },
    ServiceTier {
        price: 1499,
        options: &[
            "Packaging Design",
            "Menu Card",
            "Brochure",
            "Monthly Calendar",
            "Presentation",
        ],
        turnaround: Turnaround::Hours48,
    },
    ServiceTier {
        price: 1999,
        options: &["Logo Design (Single Option)", "Logo Intro (10 - 15 Sec Video)"],
        turnaround: Turnaround::Hours48,
    },
    ServiceTier {
        price: 4999,
        options: &["Static Website"],
        turnaround: Turnaround::Hours24,
    },
    ServiceTier {
        price: 5999,
        options: &["Social Media Marketing Package"],
        turnaround: Turnaround::Hours24,
    },
    ServiceTier {
        price: 7999,
        options: &["Retainership Plan"],
        turnaround: Turnaround::Hours24,
    },
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("unknown service option: {0}")]
    UnknownOption(String),
}

/// Look up an option by name, ignoring case. Returns the canonical name and
/// its tier.
pub fn find_option(name: &str) -> Option<(&'static str, &'static ServiceTier)> {
    let name = name.trim();
    CATALOG.iter().find_map(|tier| {
        tier.options
            .iter()
            .find(|o| o.eq_ignore_ascii_case(name))
            .map(|o| (*o, tier))
    })
}

/// Options picked so far and their total.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceSelection {
    options: Vec<String>,
    total: u32,
}

impl ServiceSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select `name` if unselected, unselect it otherwise.
    /// Returns whether the option is selected afterwards.
    pub fn toggle(&mut self, name: &str) -> Result<bool, CatalogError> {
        let (canonical, tier) =
            find_option(name).ok_or_else(|| CatalogError::UnknownOption(name.to_owned()))?;

        if let Some(pos) = self.options.iter().position(|o| o == canonical) {
            self.options.remove(pos);
            self.total -= tier.price;
            Ok(false)
        } else {
            self.options.push(canonical.to_owned());
            self.total += tier.price;
            Ok(true)
        }
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Total in rupees.
    pub fn total(&self) -> Decimal {
        Decimal::from(self.total)
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn into_parts(self) -> (Vec<String>, Decimal) {
        let total = self.total();
        (self.options, total)
    }
}
