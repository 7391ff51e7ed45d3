use super::round_to;
use crate::models::{ComponentKind, FunctionalRole, Unit};

/// Where the ingredient of a portion comes from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PortionSource {
    /// Always this ingredient.
    Staple(&'static str),
    /// `usual` normally; erythritol under sugar_free, from `sugar_free_amount` grams.
    Sweetener {
        usual: &'static str,
        sugar_free_amount: f64,
    },
    /// All-purpose flour, or the gluten-free blend under gluten_free.
    Flour,
    /// Whatever the matcher selects for the role.
    Role(FunctionalRole),
    /// `preferred` unless the request's constraints rule it out.
    Base {
        role: FunctionalRole,
        preferred: &'static str,
    },
}

/// One line of a component's base recipe, at the template's reference yield.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Portion {
    pub source: PortionSource,
    pub amount: f64,
    pub unit: Unit,
    pub preparation: &'static str,
}

pub const SUGAR_FREE_SWEETENER: &str = "erythritol";
pub const GLUTEN_FREE_FLOUR: &str = "gluten_free_flour_blend";
pub const DEFAULT_FLOUR: &str = "all_purpose_flour";
pub const DEFAULT_SWEETENER: &str = "cane_sugar";

const fn staple(id: &'static str, amount: f64, unit: Unit, preparation: &'static str) -> Portion {
    Portion {
        source: PortionSource::Staple(id),
        amount,
        unit,
        preparation,
    }
}

const fn sugar(amount: f64) -> Portion {
    Portion {
        source: PortionSource::Sweetener {
            usual: DEFAULT_SWEETENER,
            sugar_free_amount: amount,
        },
        amount,
        unit: Unit::Gram,
        preparation: "",
    }
}

const fn syrup(amount: f64, sugar_free_amount: f64) -> Portion {
    Portion {
        source: PortionSource::Sweetener {
            usual: "maple_syrup",
            sugar_free_amount,
        },
        amount,
        unit: Unit::Milliliter,
        preparation: "",
    }
}

const fn flour(amount: f64, preparation: &'static str) -> Portion {
    Portion {
        source: PortionSource::Flour,
        amount,
        unit: Unit::Gram,
        preparation,
    }
}

const fn cream(amount: f64, preparation: &'static str) -> Portion {
    Portion {
        source: PortionSource::Base {
            role: FunctionalRole::Emulsification,
            preferred: "coconut_cream",
        },
        amount,
        unit: Unit::Milliliter,
        preparation,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Base recipes
// ─────────────────────────────────────────────────────────────────────────────

const CHOUX_SHELL: &[Portion] = &[
    staple("water", 250.0, Unit::Milliliter, ""),
    staple("vegan_butter", 100.0, Unit::Gram, "cubed"),
    flour(150.0, "sifted"),
    staple("aquafaba", 200.0, Unit::Milliliter, "room temperature"),
    staple("salt", 2.0, Unit::Gram, ""),
];

const PASTRY_CREAM_FILLING: &[Portion] = &[
    cream(400.0, ""),
    sugar(80.0),
    staple("cornstarch", 30.0, Unit::Gram, ""),
    staple("vanilla_extract", 10.0, Unit::Milliliter, ""),
    staple("salt", 1.0, Unit::Gram, ""),
];

const CHOCOLATE_GLAZE: &[Portion] = &[
    staple("cocoa_powder", 40.0, Unit::Gram, ""),
    Portion {
        source: PortionSource::Base {
            role: FunctionalRole::FatStructuring,
            preferred: "coconut_oil_refined",
        },
        amount: 60.0,
        unit: Unit::Gram,
        preparation: "melted",
    },
    syrup(40.0, 30.0),
];

const CUSTARD_BASE: &[Portion] = &[
    cream(600.0, ""),
    sugar(100.0),
    staple("cornstarch", 40.0, Unit::Gram, ""),
    staple("agar_agar", 3.0, Unit::Gram, ""),
    staple("vanilla_extract", 10.0, Unit::Milliliter, ""),
];

const CARAMELIZED_SUGAR_TOP: &[Portion] = &[sugar(60.0)];

const LAMINATED_DOUGH: &[Portion] = &[
    flour(500.0, "sifted"),
    staple("water", 250.0, Unit::Milliliter, "cold"),
    staple("vegan_butter", 300.0, Unit::Gram, "cold, for lamination"),
    staple("salt", 10.0, Unit::Gram, ""),
    sugar(50.0),
];

const TART_SHELL: &[Portion] = &[
    flour(250.0, ""),
    staple("vegan_butter", 125.0, Unit::Gram, "cold, cubed"),
    sugar(50.0),
    staple("water", 50.0, Unit::Milliliter, "ice cold"),
    staple("salt", 2.0, Unit::Gram, ""),
];

const TART_PASTRY_CREAM: &[Portion] = &[
    cream(300.0, ""),
    sugar(60.0),
    Portion {
        source: PortionSource::Role(FunctionalRole::Thickening),
        amount: 25.0,
        unit: Unit::Gram,
        preparation: "",
    },
    staple("vanilla_extract", 5.0, Unit::Milliliter, ""),
];

const MACARON_SHELL: &[Portion] = &[
    staple("aquafaba", 150.0, Unit::Milliliter, ""),
    sugar(200.0),
    flour(200.0, "finely ground"),
    staple("cornstarch", 50.0, Unit::Gram, ""),
];

const MACARON_FILLING: &[Portion] = &[
    staple("vegan_butter", 100.0, Unit::Gram, "softened"),
    sugar(50.0),
    staple("vanilla_extract", 5.0, Unit::Milliliter, ""),
];

const MOUSSE_BASE: &[Portion] = &[
    cream(400.0, "chilled"),
    staple("cocoa_powder", 60.0, Unit::Gram, ""),
    syrup(80.0, 60.0),
    staple("vanilla_extract", 5.0, Unit::Milliliter, ""),
    staple("agar_agar", 2.0, Unit::Gram, ""),
];

/// Base recipe of a component kind at the template's typical yield.
pub fn portions(kind: ComponentKind) -> &'static [Portion] {
    match kind {
        ComponentKind::ChouxShell => CHOUX_SHELL,
        ComponentKind::PastryCreamFilling => PASTRY_CREAM_FILLING,
        ComponentKind::ChocolateGlaze => CHOCOLATE_GLAZE,
        ComponentKind::CustardBase => CUSTARD_BASE,
        ComponentKind::CaramelizedSugarTop => CARAMELIZED_SUGAR_TOP,
        ComponentKind::LaminatedDough => LAMINATED_DOUGH,
        ComponentKind::TartShell => TART_SHELL,
        ComponentKind::TartPastryCream => TART_PASTRY_CREAM,
        ComponentKind::MacaronShell => MACARON_SHELL,
        ComponentKind::MacaronFilling => MACARON_FILLING,
        ComponentKind::MousseBase => MOUSSE_BASE,
    }
}

/// Smallest amount a scaled portion is written with.
const MIN_SCALED_AMOUNT: f64 = 0.1;

/// Scale a base amount linearly; whole-number bases stay whole unless that would round them away.
///
/// A positive base never scales to zero.
pub fn scale_amount(base: f64, scale: f64) -> f64 {
    let scaled = base * scale;
    if base <= 0.0 {
        return 0.0;
    }
    if base.fract() == 0.0 && scaled.round() > 0.0 {
        scaled.round()
    } else {
        round_to(scaled, 1).max(MIN_SCALED_AMOUNT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_KINDS: [ComponentKind; 11] = [
        ComponentKind::ChouxShell,
        ComponentKind::PastryCreamFilling,
        ComponentKind::ChocolateGlaze,
        ComponentKind::CustardBase,
        ComponentKind::CaramelizedSugarTop,
        ComponentKind::LaminatedDough,
        ComponentKind::TartShell,
        ComponentKind::TartPastryCream,
        ComponentKind::MacaronShell,
        ComponentKind::MacaronFilling,
        ComponentKind::MousseBase,
    ];

    #[test]
    fn test_every_kind_has_positive_portions() {
        for kind in ALL_KINDS {
            let table = portions(kind);
            assert!(!table.is_empty(), "{:?} has no portions", kind);
            assert!(table.iter().all(|p| p.amount > 0.0));
        }
    }

    #[test]
    fn test_scale_amount_rounding() {
        assert_eq!(scale_amount(250.0, 0.5), 125.0);
        assert_eq!(scale_amount(2.0, 1.25), 3.0);
        assert_eq!(scale_amount(2.5, 1.5), 3.8);
        assert_eq!(scale_amount(100.0, 1.0), 100.0);
    }

    #[test]
    fn test_small_yields_keep_every_portion() {
        // salt at one serving of a twelve-serving batch
        assert_eq!(scale_amount(2.0, 1.0 / 12.0), 0.2);
        assert_eq!(scale_amount(1.0, 1.0 / 12.0), 0.1);
        assert_eq!(scale_amount(1.0, 1.0 / 100.0), 0.1);
        assert_eq!(scale_amount(5.0, 1.0 / 24.0), 0.2);
    }

    #[test]
    fn test_glaze_sweetener_branches() {
        let sweetener = CHOCOLATE_GLAZE
            .iter()
            .find(|p| matches!(p.source, PortionSource::Sweetener { .. }))
            .unwrap();
        assert_eq!(
            sweetener.source,
            PortionSource::Sweetener {
                usual: "maple_syrup",
                sugar_free_amount: 30.0
            }
        );
        assert_eq!(sweetener.unit, Unit::Milliliter);
    }
}
