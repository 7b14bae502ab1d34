use super::calendar::{sub_months, DateWindow};
use super::domain::FieldIssue;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Months before expiration during which a renewal should be filed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadTime {
    pub min_months: u32,
    pub max_months: u32,
}

impl LeadTime {
    pub const DEFAULT: Self = Self::months(2, 4);

    pub const fn months(min_months: u32, max_months: u32) -> Self {
        Self {
            min_months,
            max_months,
        }
    }

    /// `[expiration - max, expiration - min]`.
    pub fn window_before(&self, expiration: NaiveDate) -> DateWindow {
        DateWindow::new(
            sub_months(expiration, self.max_months),
            sub_months(expiration, self.min_months),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxonomyLevel {
    Motif,
    Subcategory,
    PermitType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaxonomyOption {
    pub key: &'static str,
    pub label: &'static str,
}

#[derive(Debug, Clone)]
pub struct PermitTypeNode {
    pub key: &'static str,
    pub label: &'static str,
    pub lead: LeadTime,
}

#[derive(Debug, Clone)]
pub struct SubcategoryNode {
    pub key: &'static str,
    pub label: &'static str,
    pub permit_types: Vec<PermitTypeNode>,
}

#[derive(Debug, Clone)]
pub struct MotifNode {
    pub key: &'static str,
    pub label: &'static str,
    pub subcategories: Vec<SubcategoryNode>,
}

/// Current position in the motif -> subcategory -> permit type cascade.
///
/// Choosing a value at one level always clears every level below it, so a
/// selection can never pair a permit type with a foreign subcategory through
/// these setters. Selections deserialized from outside are checked by
/// [`PermitTaxonomy::resolve`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermitSelection {
    #[serde(default)]
    pub motif: Option<String>,
    #[serde(default)]
    pub subcategory: Option<String>,
    #[serde(default)]
    pub permit_type: Option<String>,
}

impl PermitSelection {
    pub fn select(&mut self, level: TaxonomyLevel, value: impl Into<String>) {
        self.clear_below(level);
        let value = Some(value.into());
        match level {
            TaxonomyLevel::Motif => self.motif = value,
            TaxonomyLevel::Subcategory => self.subcategory = value,
            TaxonomyLevel::PermitType => self.permit_type = value,
        }
    }

    pub fn select_motif(&mut self, value: impl Into<String>) {
        self.select(TaxonomyLevel::Motif, value);
    }

    pub fn select_subcategory(&mut self, value: impl Into<String>) {
        self.select(TaxonomyLevel::Subcategory, value);
    }

    pub fn select_permit_type(&mut self, value: impl Into<String>) {
        self.select(TaxonomyLevel::PermitType, value);
    }

    pub fn clear_below(&mut self, level: TaxonomyLevel) {
        match level {
            TaxonomyLevel::Motif => {
                self.subcategory = None;
                self.permit_type = None;
            }
            TaxonomyLevel::Subcategory => self.permit_type = None,
            TaxonomyLevel::PermitType => {}
        }
    }

    pub fn is_empty(&self) -> bool {
        self.motif.is_none() && self.subcategory.is_none() && self.permit_type.is_none()
    }
}

#[derive(Debug)]
pub struct PermitTaxonomy {
    motifs: Vec<MotifNode>,
}

impl Default for PermitTaxonomy {
    fn default() -> Self {
        Self::standard()
    }
}

impl PermitTaxonomy {
    pub fn standard() -> Self {
        Self {
            motifs: standard_motifs(),
        }
    }

    pub fn motifs(&self) -> &[MotifNode] {
        &self.motifs
    }

    /// Options offered at `level`. `parent` is ignored for motifs; an unknown
    /// parent yields an empty list.
    pub fn children_of(&self, level: TaxonomyLevel, parent: Option<&str>) -> Vec<TaxonomyOption> {
        match level {
            TaxonomyLevel::Motif => self
                .motifs
                .iter()
                .map(|motif| TaxonomyOption {
                    key: motif.key,
                    label: motif.label,
                })
                .collect(),
            TaxonomyLevel::Subcategory => parent
                .and_then(|key| self.motif(key))
                .map(|motif| {
                    motif
                        .subcategories
                        .iter()
                        .map(|sub| TaxonomyOption {
                            key: sub.key,
                            label: sub.label,
                        })
                        .collect()
                })
                .unwrap_or_default(),
            TaxonomyLevel::PermitType => parent
                .and_then(|key| self.subcategory(key))
                .map(|sub| {
                    sub.permit_types
                        .iter()
                        .map(|permit| TaxonomyOption {
                            key: permit.key,
                            label: permit.label,
                        })
                        .collect()
                })
                .unwrap_or_default(),
        }
    }

    pub fn motif(&self, key: &str) -> Option<&MotifNode> {
        self.motifs.iter().find(|motif| motif.key == key)
    }

    pub fn subcategory(&self, key: &str) -> Option<&SubcategoryNode> {
        self.motifs
            .iter()
            .flat_map(|motif| motif.subcategories.iter())
            .find(|sub| sub.key == key)
    }

    pub fn permit_type(&self, key: &str) -> Option<&PermitTypeNode> {
        self.motifs
            .iter()
            .flat_map(|motif| motif.subcategories.iter())
            .flat_map(|sub| sub.permit_types.iter())
            .find(|permit| permit.key == key)
    }

    pub fn lead_time(&self, permit_type: &str) -> Option<LeadTime> {
        self.permit_type(permit_type).map(|permit| permit.lead)
    }

    /// Checks the selection against the tree and returns the leaf once all
    /// three levels are chosen. A partial but consistent selection is `Ok(None)`.
    pub fn resolve(&self, selection: &PermitSelection) -> Result<Option<&PermitTypeNode>, FieldIssue> {
        let Some(motif_key) = selection.motif.as_deref() else {
            if selection.subcategory.is_some() || selection.permit_type.is_some() {
                return Err(FieldIssue::contradiction(
                    "permit_category",
                    "a subcategory or permit type is selected without a motif",
                ));
            }
            return Ok(None);
        };

        let motif = self.motif(motif_key).ok_or_else(|| {
            FieldIssue::contradiction("permit_category", format!("unknown motif '{motif_key}'"))
        })?;

        let Some(sub_key) = selection.subcategory.as_deref() else {
            if selection.permit_type.is_some() {
                return Err(FieldIssue::contradiction(
                    "permit_category",
                    "a permit type is selected without a subcategory",
                ));
            }
            return Ok(None);
        };

        let subcategory = motif
            .subcategories
            .iter()
            .find(|sub| sub.key == sub_key)
            .ok_or_else(|| {
                FieldIssue::contradiction(
                    "permit_category",
                    format!("subcategory '{sub_key}' does not belong to motif '{motif_key}'"),
                )
            })?;

        let Some(type_key) = selection.permit_type.as_deref() else {
            return Ok(None);
        };

        subcategory
            .permit_types
            .iter()
            .find(|permit| permit.key == type_key)
            .map(Some)
            .ok_or_else(|| {
                FieldIssue::contradiction(
                    "permit_category",
                    format!("permit type '{type_key}' does not belong to subcategory '{sub_key}'"),
                )
            })
    }
}

fn permit(key: &'static str, label: &'static str, lead: LeadTime) -> PermitTypeNode {
    PermitTypeNode { key, label, lead }
}

fn standard_motifs() -> Vec<MotifNode> {
    let temporary = LeadTime::months(2, 3);
    let multi_year = LeadTime::DEFAULT;

    vec![
        MotifNode {
            key: "vie_privee_familiale",
            label: "Vie privée et familiale",
            subcategories: vec![
                SubcategoryNode {
                    key: "conjoint_de_francais",
                    label: "Conjoint de Français",
                    permit_types: vec![
                        permit(
                            "cst_vpf_conjoint",
                            "Carte de séjour temporaire « vie privée et familiale »",
                            temporary,
                        ),
                        permit("carte_resident_conjoint", "Carte de résident", multi_year),
                    ],
                },
                SubcategoryNode {
                    key: "parent_enfant_francais",
                    label: "Parent d'enfant français",
                    permit_types: vec![
                        permit(
                            "cst_vpf_parent",
                            "Carte de séjour temporaire « vie privée et familiale »",
                            temporary,
                        ),
                        permit(
                            "csp_vpf_parent",
                            "Carte de séjour pluriannuelle « vie privée et familiale »",
                            multi_year,
                        ),
                    ],
                },
                SubcategoryNode {
                    key: "liens_personnels_familiaux",
                    label: "Liens personnels et familiaux",
                    permit_types: vec![permit(
                        "cst_vpf_liens",
                        "Carte de séjour temporaire « vie privée et familiale »",
                        temporary,
                    )],
                },
            ],
        },
        MotifNode {
            key: "activite_professionnelle",
            label: "Activité professionnelle",
            subcategories: vec![
                SubcategoryNode {
                    key: "salarie",
                    label: "Salarié",
                    permit_types: vec![
                        permit("cst_salarie", "Carte de séjour temporaire « salarié »", temporary),
                        permit("csp_salarie", "Carte de séjour pluriannuelle « salarié »", multi_year),
                    ],
                },
                SubcategoryNode {
                    key: "talent",
                    label: "Talent",
                    permit_types: vec![permit(
                        "passeport_talent",
                        "Carte de séjour pluriannuelle « passeport talent »",
                        LeadTime::months(3, 4),
                    )],
                },
                SubcategoryNode {
                    key: "entrepreneur",
                    label: "Entrepreneur / profession libérale",
                    permit_types: vec![permit(
                        "cst_entrepreneur",
                        "Carte de séjour temporaire « entrepreneur / profession libérale »",
                        temporary,
                    )],
                },
            ],
        },
        MotifNode {
            key: "etudes",
            label: "Études",
            subcategories: vec![
                SubcategoryNode {
                    key: "etudiant",
                    label: "Étudiant",
                    permit_types: vec![
                        permit("cst_etudiant", "Carte de séjour temporaire « étudiant »", temporary),
                        permit(
                            "csp_etudiant",
                            "Carte de séjour pluriannuelle « étudiant »",
                            multi_year,
                        ),
                    ],
                },
                SubcategoryNode {
                    key: "recherche_emploi",
                    label: "Recherche d'emploi / création d'entreprise",
                    permit_types: vec![permit(
                        "cst_recherche_emploi",
                        "Carte de séjour temporaire « recherche d'emploi ou création d'entreprise »",
                        temporary,
                    )],
                },
            ],
        },
        MotifNode {
            key: "protection_internationale",
            label: "Protection internationale",
            subcategories: vec![
                SubcategoryNode {
                    key: "refugie",
                    label: "Réfugié",
                    permit_types: vec![permit(
                        "carte_resident_refugie",
                        "Carte de résident « réfugié »",
                        multi_year,
                    )],
                },
                SubcategoryNode {
                    key: "protection_subsidiaire",
                    label: "Protection subsidiaire",
                    permit_types: vec![permit(
                        "csp_protection_subsidiaire",
                        "Carte de séjour pluriannuelle « bénéficiaire de la protection subsidiaire »",
                        multi_year,
                    )],
                },
            ],
        },
        MotifNode {
            key: "sante",
            label: "Santé",
            subcategories: vec![SubcategoryNode {
                key: "etranger_malade",
                label: "Étranger malade",
                permit_types: vec![permit(
                    "cst_etranger_malade",
                    "Carte de séjour temporaire « vie privée et familiale » (étranger malade)",
                    temporary,
                )],
            }],
        },
    ]
}
