use crate::models::RecipeStep;

fn step(
    number: u32,
    instruction: &str,
    minutes: u32,
    temperature: Option<u32>,
    critical: bool,
    tips: &[&str],
) -> RecipeStep {
    RecipeStep {
        step_number: number,
        instruction: instruction.to_string(),
        duration_minutes: Some(minutes),
        temperature_celsius: temperature,
        critical,
        tips: tips.iter().map(|t| t.to_string()).collect(),
    }
}

fn eclair_steps() -> Vec<RecipeStep> {
    vec![
        step(1, "Preheat the oven to 200°C and line a baking sheet with parchment.", 5, Some(200), true, &["The shells only puff in a fully hot oven"]),
        step(2, "Bring the water, butter and salt to a rolling boil.", 5, None, true, &["Melt the butter completely before the flour goes in"]),
        step(3, "Off the heat, add the flour in one go and beat until the dough forms a ball.", 3, None, true, &["The dough should leave the sides of the pan cleanly"]),
        step(4, "Return to medium heat and cook 2-3 minutes, stirring, to dry the dough.", 3, None, true, &["Drying the paste improves the puff"]),
        step(5, "Transfer to a bowl and cool for 5 minutes to about 60°C.", 5, None, false, &[]),
        step(6, "Beat in the aquafaba a little at a time until smooth.", 10, None, true, &["Stop when the paste is glossy and falls in a V from the spoon"]),
        step(7, "Pipe 10 cm logs, 5 cm apart.", 10, None, false, &["A 1.5 cm round tip keeps the shells even"]),
        step(8, "Bake 30 minutes without opening the door, then 10 more at 180°C.", 40, Some(200), true, &["Opening the oven early collapses the shells"]),
        step(9, "Switch off the oven, pierce each shell and leave them inside 10 minutes to dry.", 10, None, true, &["Drying keeps the shells from going soggy"]),
        step(10, "For the filling, whisk the cream base, sweetener, cornstarch and salt in a saucepan.", 5, None, false, &[]),
        step(11, "Cook over medium heat, whisking, until thick (5-7 minutes).", 7, None, true, &["It should coat the back of a spoon"]),
        step(12, "Stir in the vanilla, cover the surface with film and chill 2 hours.", 120, None, false, &[]),
        step(13, "For the glaze, whisk cocoa, melted fat and sweetener until smooth.", 5, None, false, &[]),
        step(14, "Split the shells, pipe in the filling and replace the tops.", 10, None, false, &[]),
        step(15, "Dip the tops in glaze and let set 15 minutes.", 15, None, false, &[]),
    ]
}

fn creme_brulee_steps() -> Vec<RecipeStep> {
    vec![
        step(1, "Preheat the oven to 150°C.", 5, Some(150), false, &[]),
        step(2, "Whisk the cream base, sweetener, cornstarch and agar in a saucepan.", 5, None, false, &[]),
        step(3, "Heat over medium, whisking, until thick and bubbling (8-10 minutes).", 10, None, true, &["Keep it below a hard boil or it may split"]),
        step(4, "Off the heat, whisk in the vanilla.", 1, None, false, &[]),
        step(5, "Strain through a fine sieve.", 3, None, false, &["Straining gives a silky custard"]),
        step(6, "Divide among ramekins set in a deep baking dish.", 5, None, false, &[]),
        step(7, "Pour hot water into the dish halfway up the ramekins.", 5, None, true, &["The water bath keeps the heat gentle"]),
        step(8, "Bake 35-40 minutes until set with a slight wobble.", 40, Some(150), true, &["The custard firms as it cools"]),
        step(9, "Cool to room temperature, then chill 4 hours.", 240, None, false, &[]),
        step(10, "Sprinkle an even layer of sugar over each custard.", 5, None, false, &[]),
        step(11, "Caramelize with a torch until golden.", 5, None, true, &["Keep the flame moving and rest 2 minutes before serving"]),
    ]
}

fn croissant_steps() -> Vec<RecipeStep> {
    vec![
        step(1, "Mix flour, water, salt and sweetener, then knead 5 minutes.", 10, None, false, &[]),
        step(2, "Wrap the dough and chill 1 hour.", 60, None, false, &[]),
        step(3, "Roll the butter between parchment into a 15 cm square and chill.", 10, None, false, &[]),
        step(4, "Roll the dough to a 30 cm square, enclose the butter.", 10, None, true, &["The butter should be cold but pliable"]),
        step(5, "Roll out, fold in thirds and chill 30 minutes. Repeat three times.", 120, None, true, &["Each fold multiplies the layers"]),
        step(6, "Roll to 5 mm, cut triangles and roll into crescents.", 20, None, false, &[]),
        step(7, "Proof 2 hours at room temperature until doubled.", 120, None, false, &[]),
        step(8, "Bake at 200°C for 15-20 minutes until golden.", 20, Some(200), false, &[]),
    ]
}

fn tart_steps() -> Vec<RecipeStep> {
    vec![
        step(1, "Mix flour, sweetener and salt, then rub in the cold butter.", 10, None, false, &[]),
        step(2, "Add ice water until the dough holds. Chill 30 minutes.", 30, None, false, &[]),
        step(3, "Roll out, line the tart pan and prick the base.", 10, None, false, &[]),
        step(4, "Blind bake with weights for 15 minutes at 180°C.", 15, Some(180), true, &["Blind baking prevents a soggy base"]),
        step(5, "Remove the weights and bake 10 minutes more until golden.", 10, Some(180), false, &[]),
        step(6, "Cook the cream base, sweetener and thickener until thick.", 10, None, false, &[]),
        step(7, "Cool the cream, fill the shell and top with fruit.", 15, None, false, &[]),
        step(8, "Chill 2 hours before serving.", 120, None, false, &[]),
    ]
}

fn macaron_steps() -> Vec<RecipeStep> {
    vec![
        step(1, "Whip the aquafaba to stiff peaks, adding the sweetener gradually.", 10, None, true, &["Peaks should stand straight"]),
        step(2, "Sift the flour and cornstarch and fold into the meringue.", 5, None, true, &["Stop when the batter flows like lava"]),
        step(3, "Pipe 3 cm rounds and tap the tray to release bubbles.", 15, None, false, &[]),
        step(4, "Rest 30-60 minutes until the surface is dry to the touch.", 45, None, true, &["The skin is what forms the feet"]),
        step(5, "Bake at 150°C for 12-15 minutes and cool completely.", 15, Some(150), false, &[]),
        step(6, "Beat butter, sweetener and vanilla until fluffy.", 5, None, false, &[]),
        step(7, "Pipe filling onto half the shells and sandwich.", 10, None, false, &[]),
        step(8, "Refrigerate 24 hours to mature.", 1440, None, false, &[]),
    ]
}

fn mousse_steps() -> Vec<RecipeStep> {
    vec![
        step(1, "Bloom the agar in 2 tbsp water for 5 minutes.", 5, None, false, &[]),
        step(2, "Heat 100 ml of the cream base with the agar until dissolved.", 5, None, true, &["Agar only sets after reaching 85°C"]),
        step(3, "Whisk in the cocoa and sweetener until smooth.", 3, None, false, &[]),
        step(4, "Cool to room temperature, stirring now and then.", 15, None, false, &[]),
        step(5, "Whip the remaining cream base to soft peaks.", 5, None, false, &[]),
        step(6, "Fold the chocolate mixture into the whipped cream.", 5, None, true, &["Fold gently to keep the air in"]),
        step(7, "Divide into glasses and chill 4 hours.", 240, None, false, &[]),
        step(8, "Serve chilled.", 2, None, false, &[]),
    ]
}

fn generic_steps() -> Vec<RecipeStep> {
    vec![
        step(1, "Weigh out all ingredients.", 10, None, false, &[]),
        step(2, "Prepare each component.", 30, None, false, &[]),
        step(3, "Bake or chill as the dessert requires.", 30, None, false, &[]),
        step(4, "Cool completely before serving.", 30, None, false, &[]),
    ]
}

/// Step-by-step method for a dessert, written for its typical yield.
pub fn instructions_for(dessert_id: &str) -> Vec<RecipeStep> {
    match dessert_id {
        "eclair" => eclair_steps(),
        "creme_brulee" => creme_brulee_steps(),
        "croissant" => croissant_steps(),
        "tart" => tart_steps(),
        "macaron" => macaron_steps(),
        "mousse" => mousse_steps(),
        _ => generic_steps(),
    }
}

pub fn storage_instructions(dessert_id: &str) -> &'static str {
    match dessert_id {
        "eclair" => "Keep unfilled shells airtight at room temperature up to 2 days. Fill just before serving; filled éclairs keep 1 day refrigerated.",
        "creme_brulee" => "Refrigerate covered up to 3 days. Caramelize the top just before serving.",
        "croissant" => "Keep airtight at room temperature up to 2 days. Refresh 5 minutes in a hot oven.",
        "tart" => "Refrigerate up to 2 days. Add fresh fruit on the day of serving.",
        "macaron" => "Refrigerate airtight up to 4 days. Serve at room temperature.",
        "mousse" => "Refrigerate covered up to 2 days.",
        _ => "Refrigerate in an airtight container.",
    }
}

pub fn shelf_life_days(dessert_id: &str) -> u32 {
    match dessert_id {
        "eclair" => 1,
        "creme_brulee" => 3,
        "macaron" => 4,
        _ => 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steps_are_numbered_in_order() {
        for id in ["eclair", "creme_brulee", "croissant", "tart", "macaron", "mousse", "other"] {
            let steps = instructions_for(id);
            for (i, s) in steps.iter().enumerate() {
                assert_eq!(s.step_number as usize, i + 1, "{} step {}", id, i);
            }
        }
    }

    #[test]
    fn test_eclair_has_critical_steps() {
        let steps = instructions_for("eclair");
        assert_eq!(steps.len(), 15);
        assert!(steps.iter().filter(|s| s.critical).count() >= 5);
    }

    #[test]
    fn test_storage_and_shelf_life() {
        assert_eq!(shelf_life_days("eclair"), 1);
        assert_eq!(shelf_life_days("creme_brulee"), 3);
        assert_eq!(shelf_life_days("mousse"), 2);
        assert!(storage_instructions("tart").contains("fruit"));
    }
}
