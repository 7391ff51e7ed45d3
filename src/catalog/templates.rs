use std::collections::BTreeMap;

use crate::models::{
    ComponentKind, ComponentRequirement, DessertCategory, DessertTemplate, DifficultyLevel,
    FunctionalRole, PropertyRange, TextureProfile,
};

use FunctionalRole::*;
use TextureProfile::*;

fn component(
    kind: ComponentKind,
    name: &str,
    required_roles: &[FunctionalRole],
    texture_targets: &[TextureProfile],
    ratio_percent: f64,
    critical: &[(&str, f64, f64)],
) -> ComponentRequirement {
    ComponentRequirement {
        kind,
        name: name.to_string(),
        required_roles: required_roles.to_vec(),
        texture_targets: texture_targets.to_vec(),
        ratio_percent,
        critical_properties: critical
            .iter()
            .map(|(property, min, max)| (property.to_string(), PropertyRange::new(*min, *max)))
            .collect::<BTreeMap<_, _>>(),
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn eclair_template() -> DessertTemplate {
    DessertTemplate {
        id: "eclair".to_string(),
        name: "Éclair".to_string(),
        category: DessertCategory::Choux,
        components: vec![
            component(
                ComponentKind::ChouxShell,
                "Choux Pastry Shell",
                &[FatStructuring, Foaming, Binding, MoistureRetention],
                &[Crispy, Airy],
                40.0,
                &[
                    ("fat_content", 15.0, 25.0),
                    ("water_content", 50.0, 60.0),
                    ("protein_content", 8.0, 12.0),
                ],
            ),
            component(
                ComponentKind::PastryCreamFilling,
                "Pastry Cream Filling",
                &[Thickening, Emulsification, FlavorCarrier, MoistureRetention],
                &[Creamy, Smooth],
                50.0,
                &[("fat_content", 8.0, 15.0), ("viscosity_cps", 5000.0, 15000.0)],
            ),
            component(
                ComponentKind::ChocolateGlaze,
                "Chocolate Glaze",
                &[FatStructuring, Crystallization, FlavorCarrier],
                &[Smooth],
                10.0,
                &[("fat_content", 30.0, 40.0)],
            ),
        ],
        difficulty: DifficultyLevel::Intermediate,
        typical_yield: 12,
        preparation_time_minutes: 90,
        baking_temp_celsius: Some(200),
        baking_time_minutes: Some(30),
        special_equipment: strings(&["piping bag", "pastry tips"]),
        critical_techniques: strings(&[
            "choux paste preparation",
            "even piping",
            "steam management during baking",
            "tempering the pastry cream",
        ]),
        common_failures: strings(&[
            "shells collapse after baking (weak structure)",
            "shells stay flat (too much fat or moisture)",
            "runny cream (not enough thickener)",
            "grainy glaze (fat crystallized unevenly)",
        ]),
        success_indicators: strings(&[
            "hollow, crisp shells",
            "smooth, stable cream",
            "glossy glaze",
            "shells stay crisp once filled",
        ]),
        notes: "Steam in the oven drives the initial puff".to_string(),
    }
}

pub fn creme_brulee_template() -> DessertTemplate {
    DessertTemplate {
        id: "creme_brulee".to_string(),
        name: "Crème Brûlée".to_string(),
        category: DessertCategory::Custard,
        components: vec![
            component(
                ComponentKind::CustardBase,
                "Custard Base",
                &[Thickening, Emulsification, Binding, FlavorCarrier],
                &[Creamy, Smooth],
                90.0,
                &[
                    ("fat_content", 15.0, 25.0),
                    ("protein_content", 3.0, 6.0),
                    ("viscosity_cps", 3000.0, 8000.0),
                ],
            ),
            component(
                ComponentKind::CaramelizedSugarTop,
                "Caramelized Sugar Top",
                &[Crystallization, Browning],
                &[Crunchy],
                10.0,
                &[],
            ),
        ],
        difficulty: DifficultyLevel::Intermediate,
        typical_yield: 6,
        preparation_time_minutes: 60,
        baking_temp_celsius: Some(150),
        baking_time_minutes: Some(40),
        special_equipment: strings(&["ramekins", "kitchen torch", "water bath"]),
        critical_techniques: strings(&[
            "gentle heating",
            "bain-marie baking",
            "caramelizing the top",
            "temperature control",
        ]),
        common_failures: strings(&[
            "custard curdles (overheated)",
            "custard stays loose (not enough thickener)",
            "sugar burns before it caramelizes",
            "watery texture (poor emulsion)",
        ]),
        success_indicators: strings(&[
            "set custard with a slight wobble",
            "even caramel crust",
            "no bubbles or cracks",
        ]),
        notes: "A rich cream base carries the custard".to_string(),
    }
}

pub fn croissant_template() -> DessertTemplate {
    DessertTemplate {
        id: "croissant".to_string(),
        name: "Croissant".to_string(),
        category: DessertCategory::Laminated,
        components: vec![component(
            ComponentKind::LaminatedDough,
            "Laminated Dough",
            &[FatStructuring, Binding, MoistureRetention],
            &[Flaky, Crispy],
            100.0,
            &[("fat_content", 25.0, 35.0), ("water_content", 35.0, 45.0)],
        )],
        difficulty: DifficultyLevel::Expert,
        typical_yield: 12,
        preparation_time_minutes: 180,
        baking_temp_celsius: Some(200),
        baking_time_minutes: Some(20),
        special_equipment: strings(&["rolling pin", "pastry brush"]),
        critical_techniques: strings(&[
            "lamination",
            "letter folds",
            "temperature control",
            "resting between turns",
        ]),
        common_failures: strings(&[
            "butter breaks through the dough",
            "layers fuse together",
            "tough dough",
        ]),
        success_indicators: strings(&["distinct flaky layers", "deep golden color", "open crumb"]),
        notes: "Needs cold fat and several rests".to_string(),
    }
}

pub fn tart_template() -> DessertTemplate {
    DessertTemplate {
        id: "tart".to_string(),
        name: "Fruit Tart".to_string(),
        category: DessertCategory::Tart,
        components: vec![
            component(
                ComponentKind::TartShell,
                "Tart Shell",
                &[FatStructuring, Binding],
                &[Crispy, Crunchy],
                40.0,
                &[("fat_content", 30.0, 40.0)],
            ),
            component(
                ComponentKind::TartPastryCream,
                "Pastry Cream",
                &[Thickening, Emulsification],
                &[Creamy],
                60.0,
                &[("fat_content", 10.0, 20.0)],
            ),
        ],
        difficulty: DifficultyLevel::Intermediate,
        typical_yield: 8,
        preparation_time_minutes: 90,
        baking_temp_celsius: Some(180),
        baking_time_minutes: Some(25),
        special_equipment: strings(&["tart pan", "pie weights"]),
        critical_techniques: strings(&["blind baking", "even rolling", "crimping"]),
        common_failures: strings(&["soggy base", "shrinking crust", "cracked shell"]),
        success_indicators: strings(&["crisp shell", "smooth cream", "no gaps at the rim"]),
        notes: "Blind bake for a crisp base".to_string(),
    }
}

pub fn macaron_template() -> DessertTemplate {
    DessertTemplate {
        id: "macaron".to_string(),
        name: "Macaron".to_string(),
        category: DessertCategory::Macaron,
        components: vec![
            component(
                ComponentKind::MacaronShell,
                "Macaron Shell",
                &[Foaming, Binding, Crystallization],
                &[Smooth, Chewy],
                70.0,
                &[("protein_content", 5.0, 10.0)],
            ),
            component(
                ComponentKind::MacaronFilling,
                "Filling",
                &[Emulsification, FlavorCarrier],
                &[Creamy],
                30.0,
                &[("fat_content", 40.0, 60.0)],
            ),
        ],
        difficulty: DifficultyLevel::Expert,
        typical_yield: 24,
        preparation_time_minutes: 120,
        baking_temp_celsius: Some(150),
        baking_time_minutes: Some(15),
        special_equipment: strings(&["piping bag", "silicone mat"]),
        critical_techniques: strings(&[
            "macaronage",
            "piping",
            "resting before baking",
            "precise oven temperature",
        ]),
        common_failures: strings(&["no feet", "hollow shells", "cracked tops", "uneven bake"]),
        success_indicators: strings(&["smooth tops", "ruffled feet", "chewy bite"]),
        notes: "Very sensitive to technique".to_string(),
    }
}

pub fn mousse_template() -> DessertTemplate {
    DessertTemplate {
        id: "mousse".to_string(),
        name: "Chocolate Mousse".to_string(),
        category: DessertCategory::Mousse,
        components: vec![component(
            ComponentKind::MousseBase,
            "Mousse Base",
            &[Foaming, Emulsification, Thickening],
            &[Airy, Creamy],
            100.0,
            &[("fat_content", 15.0, 25.0)],
        )],
        difficulty: DifficultyLevel::Intermediate,
        typical_yield: 6,
        preparation_time_minutes: 30,
        baking_temp_celsius: None,
        baking_time_minutes: None,
        special_equipment: strings(&["whisk", "mixing bowls"]),
        critical_techniques: strings(&["folding", "temperature control", "aeration"]),
        common_failures: strings(&["deflated mousse", "grainy texture", "separation"]),
        success_indicators: strings(&["light and airy", "holds its shape", "smooth texture"]),
        notes: "No bake; chill to set".to_string(),
    }
}

/// Every built-in template.
pub fn builtin_templates() -> Vec<DessertTemplate> {
    vec![
        eclair_template(),
        creme_brulee_template(),
        croissant_template(),
        tart_template(),
        macaron_template(),
        mousse_template(),
    ]
}
