//! Static pricing catalog: service tiers, technology approaches, add-on
//! packages, predefined bundles, and client-type discounts.
//!
//! The catalog is read-only at runtime and initialized once per process.
//! Identifiers flowing through lookups always originate from the catalog
//! itself, so an unknown id is a programming error and panics rather than
//! producing a user-facing error.

use std::sync::OnceLock;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TierId(pub String);

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TechnologyId(pub String);

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PackageId(pub String);

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BundleId(pub String);

/// Service level. `price: None` means the tier is quoted in consultation.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Tier {
    pub id: TierId,
    pub name: &'static str,
    pub price: Option<Decimal>,
    pub inclusions: Vec<&'static str>,
}

impl Tier {
    pub fn is_consultation(&self) -> bool {
        self.price.is_none()
    }
}

/// Implementation approach. Compatibility is expressed against tiers.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Technology {
    pub id: TechnologyId,
    pub name: &'static str,
    pub price: Option<Decimal>,
    pub compatible_tiers: Vec<TierId>,
}

impl Technology {
    pub fn is_consultation(&self) -> bool {
        self.price.is_none()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AddOnPackage {
    pub id: PackageId,
    pub name: &'static str,
    pub price: Decimal,
    /// Recurring monthly fee rather than a one-time charge.
    pub monthly: bool,
    pub compatible_technologies: Vec<TechnologyId>,
    pub description: Option<&'static str>,
}

/// A predefined bundle is either composed from catalog parts or carries a
/// flat override price with a redirect to a dedicated product page. The two
/// shapes are mutually exclusive and resolved here, at data definition time.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum BundleKind {
    Composed {
        tier: TierId,
        technology: TechnologyId,
        alternate_technologies: Vec<TechnologyId>,
        packages: Vec<PackageId>,
    },
    FlatPrice {
        price: Decimal,
        redirect_to: &'static str,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Bundle {
    pub id: BundleId,
    pub name: &'static str,
    pub description: &'static str,
    pub kind: BundleKind,
}

impl Bundle {
    pub fn is_flat_price(&self) -> bool {
        matches!(self.kind, BundleKind::FlatPrice { .. })
    }
}

/// Who is buying. Each variant carries a fixed discount rate applied
/// multiplicatively to both one-time and monthly totals.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClientType {
    #[default]
    Company,
    Student,
    NonProfit,
}

impl ClientType {
    pub fn discount_rate(self) -> Decimal {
        match self {
            Self::Company => Decimal::ZERO,
            Self::Student => Decimal::new(25, 2),
            Self::NonProfit => Decimal::new(50, 2),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Company => "Company",
            Self::Student => "Student",
            Self::NonProfit => "Non-profit",
        }
    }
}

pub struct Catalog {
    tiers: Vec<Tier>,
    technologies: Vec<Technology>,
    packages: Vec<AddOnPackage>,
    bundles: Vec<Bundle>,
}

static GLOBAL: OnceLock<Catalog> = OnceLock::new();

impl Catalog {
    /// The standard production catalog.
    pub fn standard() -> Self {
        let tiers = vec![
            Tier {
                id: TierId("starter".to_owned()),
                name: "Starter",
                price: Some(Decimal::new(249, 0)),
                inclusions: vec![
                    "Unique design",
                    "Mobile-friendly",
                    "1 design iteration",
                    "Up to 5 pages",
                    "SEO setup",
                ],
            },
            Tier {
                id: TierId("professional".to_owned()),
                name: "Professional",
                price: Some(Decimal::new(499, 0)),
                inclusions: vec![
                    "Everything in starter +",
                    "Pre-defined themes",
                    "5 design iterations",
                    "Unlimited pages",
                    "Advanced SEO optimization",
                    "Performance optimized",
                    "Including texts & images",
                ],
            },
            Tier {
                id: TierId("custom-made".to_owned()),
                name: "Custom-made",
                price: None,
                inclusions: vec![
                    "Everything in professional +",
                    "Unlimited design iterations",
                    "Advanced database integrations",
                    "Custom API development",
                    "Third-party service integrations",
                    "AI integrations",
                    "User authentication system",
                ],
            },
        ];

        let all_tiers = || {
            vec![
                TierId("starter".to_owned()),
                TierId("professional".to_owned()),
                TierId("custom-made".to_owned()),
            ]
        };
        let priced_tiers =
            || vec![TierId("starter".to_owned()), TierId("professional".to_owned())];

        let technologies = vec![
            Technology {
                id: TechnologyId("undecided".to_owned()),
                name: "I don't know",
                price: None,
                compatible_tiers: all_tiers(),
            },
            Technology {
                id: TechnologyId("frontend-full".to_owned()),
                name: "Frontend Full",
                price: Some(Decimal::new(249, 0)),
                compatible_tiers: all_tiers(),
            },
            Technology {
                id: TechnologyId("cms-headless".to_owned()),
                name: "CMS (headless) + flexible frontend",
                price: Some(Decimal::new(499, 0)),
                compatible_tiers: priced_tiers(),
            },
            Technology {
                id: TechnologyId("cms-full".to_owned()),
                name: "CMS Full",
                price: Some(Decimal::new(749, 0)),
                compatible_tiers: priced_tiers(),
            },
            Technology {
                id: TechnologyId("in-consultation".to_owned()),
                name: "In consultation",
                price: None,
                compatible_tiers: vec![TierId("custom-made".to_owned())],
            },
        ];

        let cms_only = || {
            vec![TechnologyId("cms-headless".to_owned()), TechnologyId("cms-full".to_owned())]
        };
        let buildable = || {
            vec![
                TechnologyId("cms-headless".to_owned()),
                TechnologyId("cms-full".to_owned()),
                TechnologyId("frontend-full".to_owned()),
            ]
        };

        let packages = vec![
            AddOnPackage {
                id: PackageId("integrations".to_owned()),
                name: "Integrations (CMS plugins)",
                price: Decimal::new(99, 0),
                monthly: false,
                compatible_technologies: cms_only(),
                description: None,
            },
            AddOnPackage {
                id: PackageId("contact-forms".to_owned()),
                name: "Contact Forms",
                price: Decimal::new(49, 0),
                monthly: false,
                compatible_technologies: {
                    let mut list = buildable();
                    list.push(TechnologyId("in-consultation".to_owned()));
                    list
                },
                description: None,
            },
            AddOnPackage {
                id: PackageId("setup".to_owned()),
                name: "Setup",
                price: Decimal::new(99, 0),
                monthly: false,
                compatible_technologies: buildable(),
                description: Some("Domain, hosting & email (one-time fee)"),
            },
            AddOnPackage {
                id: PackageId("maintenance".to_owned()),
                name: "Maintenance",
                price: Decimal::new(999, 2),
                monthly: true,
                compatible_technologies: buildable(),
                description: Some("Domain, hosting, email and updates (\u{20ac}9.99/month)"),
            },
        ];

        let bundles = vec![
            Bundle {
                id: BundleId("simple".to_owned()),
                name: "Simple Bundle",
                description: "Simple website with basic functionality",
                kind: BundleKind::Composed {
                    tier: TierId("starter".to_owned()),
                    technology: TechnologyId("frontend-full".to_owned()),
                    alternate_technologies: Vec::new(),
                    packages: vec![
                        PackageId("contact-forms".to_owned()),
                        PackageId("setup".to_owned()),
                        PackageId("maintenance".to_owned()),
                    ],
                },
            },
            Bundle {
                id: BundleId("plus".to_owned()),
                name: "Plus Bundle",
                description: "Complete CMS solution for businesses",
                kind: BundleKind::Composed {
                    tier: TierId("professional".to_owned()),
                    technology: TechnologyId("cms-full".to_owned()),
                    alternate_technologies: vec![TechnologyId("cms-headless".to_owned())],
                    packages: vec![
                        PackageId("contact-forms".to_owned()),
                        PackageId("integrations".to_owned()),
                        PackageId("setup".to_owned()),
                        PackageId("maintenance".to_owned()),
                    ],
                },
            },
            Bundle {
                id: BundleId("premium".to_owned()),
                name: "Premium Bundle",
                description: "Advanced solution with custom frontend",
                kind: BundleKind::Composed {
                    tier: TierId("custom-made".to_owned()),
                    technology: TechnologyId("in-consultation".to_owned()),
                    alternate_technologies: Vec::new(),
                    packages: Vec::new(),
                },
            },
            Bundle {
                id: BundleId("mvp".to_owned()),
                name: "MVP Bundle",
                description: "Rapid development for your minimum viable product",
                kind: BundleKind::FlatPrice {
                    price: Decimal::new(499, 0),
                    redirect_to: "/mvp",
                },
            },
        ];

        Self { tiers, technologies, packages, bundles }
    }

    /// Process-wide shared catalog, initialized on first use.
    pub fn global() -> &'static Catalog {
        GLOBAL.get_or_init(Catalog::standard)
    }

    pub fn tiers(&self) -> &[Tier] {
        &self.tiers
    }

    pub fn technologies(&self) -> &[Technology] {
        &self.technologies
    }

    pub fn packages(&self) -> &[AddOnPackage] {
        &self.packages
    }

    pub fn bundles(&self) -> &[Bundle] {
        &self.bundles
    }

    pub fn tier(&self, id: &TierId) -> &Tier {
        self.tiers
            .iter()
            .find(|tier| &tier.id == id)
            .unwrap_or_else(|| panic!("unknown tier id: {}", id.0))
    }

    pub fn technology(&self, id: &TechnologyId) -> &Technology {
        self.technologies
            .iter()
            .find(|technology| &technology.id == id)
            .unwrap_or_else(|| panic!("unknown technology id: {}", id.0))
    }

    pub fn package(&self, id: &PackageId) -> &AddOnPackage {
        self.packages
            .iter()
            .find(|package| &package.id == id)
            .unwrap_or_else(|| panic!("unknown package id: {}", id.0))
    }

    pub fn bundle(&self, id: &BundleId) -> &Bundle {
        self.bundles
            .iter()
            .find(|bundle| &bundle.id == id)
            .unwrap_or_else(|| panic!("unknown bundle id: {}", id.0))
    }

    /// True iff `technology` lists `tier` among its compatible tiers.
    pub fn technology_compatible(&self, tier: &TierId, technology: &TechnologyId) -> bool {
        self.technology(technology).compatible_tiers.contains(tier)
    }

    /// True iff `package` lists `technology` among its compatible approaches.
    pub fn package_compatible(&self, technology: &TechnologyId, package: &PackageId) -> bool {
        self.package(package).compatible_technologies.contains(technology)
    }

    /// Bundles shown to a given client type. Flat-price bundles are reserved
    /// for standard company pricing and always sort last.
    pub fn visible_bundles(&self, client_type: ClientType) -> Vec<&Bundle> {
        let mut visible: Vec<&Bundle> = self
            .bundles
            .iter()
            .filter(|bundle| !bundle.is_flat_price() || client_type == ClientType::Company)
            .collect();
        visible.sort_by_key(|bundle| bundle.is_flat_price());
        visible
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}
