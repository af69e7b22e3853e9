//! Prompt text for an external language-model advisor
//!
//! The core never calls a model. This renders the request an outside
//! collaborator can send to one, built from the same prediction and catalog
//! the blend composer uses.

use crate::catalog::{FeedIngredient, FEED_CATALOG};
use crate::prediction::NutritionPrediction;
use std::fmt;

/// Nutritionist prompt for one prediction
pub struct AdvisorPrompt<'a> {
    prediction: &'a NutritionPrediction,
    unavailable: Vec<String>,
}

impl<'a> AdvisorPrompt<'a> {
    pub fn new<S: AsRef<str>>(prediction: &'a NutritionPrediction, unavailable: &[S]) -> Self {
        let unavailable = unavailable
            .iter()
            .map(|s| s.as_ref().trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        Self {
            prediction,
            unavailable,
        }
    }

    /// Catalog entries not marked unavailable, in catalog order
    pub fn available_ingredients(&self) -> impl Iterator<Item = &'static FeedIngredient> + '_ {
        FEED_CATALOG.iter().filter(move |i| {
            !self
                .unavailable
                .iter()
                .any(|u| u.eq_ignore_ascii_case(i.name))
        })
    }
}

impl fmt::Display for AdvisorPrompt<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = self.prediction;
        writeln!(f, "You are an expert cattle nutritionist.")?;
        writeln!(f)?;
        writeln!(f, "A cow needs the following nutrients per day:")?;
        writeln!(f, "- Dry Matter Intake (DMI): {:.1} lbs", p.dm_intake_lbs)?;
        writeln!(
            f,
            "- Total Digestible Nutrients (TDN): {:.1}% of DM ({:.1} lbs)",
            p.tdn_pct, p.tdn_lbs
        )?;
        writeln!(
            f,
            "- Net Energy for Maintenance (NEm): {:.2} Mcal/lb ({:.1} Mcal)",
            p.nem_mcal_per_lb, p.nem_mcal
        )?;
        writeln!(
            f,
            "- Net Energy for Gain (NEg): {:.2} Mcal/lb ({:.1} Mcal)",
            p.neg_mcal_per_lb, p.neg_mcal
        )?;
        writeln!(f, "- Crude Protein (CP): {:.1}% of DM ({:.2} lbs)", p.cp_pct, p.cp_lbs)?;
        writeln!(f, "- Calcium (Ca): {:.2}% of DM ({:.0} g)", p.ca_pct, p.ca_grams)?;
        writeln!(f, "- Phosphorus (P): {:.2}% of DM ({:.0} g)", p.p_pct, p.p_grams)?;
        writeln!(f)?;

        writeln!(
            f,
            "Here is a list of available feed ingredients and their nutrient values per pound of dry matter:"
        )?;
        writeln!(f)?;
        writeln!(
            f,
            "| {:<20} | {:<7} | {:<13} | {:<13} | {:<6} | {:<6} | {:<6} |",
            "Feed Ingredient", "TDN (%)", "NEm (Mcal/lb)", "NEg (Mcal/lb)", "CP (%)", "Ca (%)", "P (%)"
        )?;
        writeln!(
            f,
            "|{:-<22}|{:-<9}|{:-<15}|{:-<15}|{:-<8}|{:-<8}|{:-<8}|",
            "", "", "", "", "", "", ""
        )?;
        for i in self.available_ingredients() {
            writeln!(
                f,
                "| {:<20} | {:<7} | {:<13} | {:<13} | {:<6} | {:<6} | {:<6} |",
                i.name, i.tdn_pct, i.nem_per_lb, i.neg_per_lb, i.cp_pct, i.ca_pct, i.p_pct
            )?;
        }
        writeln!(f)?;

        writeln!(f, "**Your Task:**")?;
        writeln!(f, "- Design a realistic daily feed menu of 5 to 7 ingredients from the available ingredients.")?;
        writeln!(f, "- Show quantity of each ingredient in pounds of dry matter.")?;
        writeln!(f, "- Calculate and show the contribution of each to total TDN, NEm, NEg, CP, Ca, and P.")?;
        writeln!(f, "- Ensure the totals are as close as possible to the cow's requirements above.")?;
        writeln!(f, "- Keep the ingredients reasonable and commonly used.")?;

        if !self.unavailable.is_empty() {
            writeln!(f)?;
            writeln!(
                f,
                "Note: The following ingredients are not available: {}. Please adjust the feed menu accordingly.",
                self.unavailable.join(", ")
            )?;
        }
        writeln!(f)?;

        writeln!(f, "Return a table like this:")?;
        writeln!(f)?;
        writeln!(
            f,
            "| Ingredient | Amount (lbs DM) | TDN (lbs) | NEm (Mcal) | NEg (Mcal) | CP (lbs) | Ca (g) | P (g) |"
        )?;
        writeln!(f, "|---|---|---|---|---|---|---|---|")?;
        writeln!(f, "| Feed 1 | | | | | | | |")?;
        writeln!(f, "| ... | | | | | | | |")?;
        writeln!(
            f,
            "| **Total** | {:.1} | {:.1} | {:.1} | {:.1} | {:.2} | {:.0} | {:.0} |",
            p.dm_intake_lbs, p.tdn_lbs, p.nem_mcal, p.neg_mcal, p.cp_lbs, p.ca_grams, p.p_grams
        )?;
        writeln!(f)?;
        writeln!(f, "After your table, list any assumptions or notes you made.")?;
        writeln!(f)?;
        write!(
            f,
            "Start your response with: \"Here is the feed menu that meets the cow's nutrient needs.\""
        )
    }
}
