//! Markdown report for a prediction and its feed menu

use crate::blend::FeedMenu;
use crate::cattle::CattleInfo;
use crate::prediction::NutritionPrediction;
use std::fmt;

const GUIDELINES: &[&str] = &[
    "Introduce ration changes gradually over 7 to 10 days to avoid digestive upset.",
    "Provide clean, fresh water at all times; intake drops quickly when water is limited.",
    "Weigh or estimate body weight every 30 days and re-run the prediction as animals grow.",
    "Mix concentrates evenly with forage, or feed them in split meals, to limit acidosis risk.",
    "Keep the calcium to phosphorus ratio between 1.5:1 and 2:1 when adjusting minerals.",
    "Have forages tested where possible; catalog values are averages and real feeds vary.",
];

/// Renders the full report; build with [`FeedReport::new`] and format with
/// `to_string()` or `{}`.
pub struct FeedReport<'a> {
    info: &'a CattleInfo,
    prediction: &'a NutritionPrediction,
    menu: &'a FeedMenu,
}

impl<'a> FeedReport<'a> {
    pub fn new(info: &'a CattleInfo, prediction: &'a NutritionPrediction, menu: &'a FeedMenu) -> Self {
        Self {
            info,
            prediction,
            menu,
        }
    }

    fn write_cattle_info(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## Cattle Information")?;
        writeln!(f)?;
        writeln!(f, "- Category: {}", self.info.category)?;
        writeln!(f, "- Current body weight: {:.1} lbs", self.info.body_weight)?;
        writeln!(f, "- Target weight: {:.1} lbs", self.info.target_weight)?;
        writeln!(f, "- Average daily gain: {:.2} lbs/day", self.info.average_daily_gain)?;
        writeln!(f)
    }

    fn write_requirements(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = self.prediction;
        writeln!(f, "## Daily Nutrient Requirements")?;
        writeln!(f)?;
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
        writeln!(f)
    }

    fn write_feed_table(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## Feed Menu")?;
        writeln!(f)?;
        writeln!(
            f,
            "| Ingredient | Role | Amount (lbs DM) | TDN (lbs) | NEm (Mcal) | NEg (Mcal) | CP (lbs) | Ca (g) | P (g) |"
        )?;
        writeln!(f, "|---|---|---:|---:|---:|---:|---:|---:|---:|")?;
        for row in self.menu.recommendations() {
            let c = &row.contribution;
            writeln!(
                f,
                "| {} | {} | {:.2} | {:.2} | {:.2} | {:.2} | {:.2} | {:.1} | {:.1} |",
                row.ingredient.name, row.role, c.dm_lbs, c.tdn_lbs, c.nem_mcal, c.neg_mcal, c.cp_lbs, c.ca_g, c.p_g
            )?;
        }
        let t = self.menu.totals();
        writeln!(
            f,
            "| **Total** | | {:.2} | {:.2} | {:.2} | {:.2} | {:.2} | {:.1} | {:.1} |",
            t.dm_lbs, t.tdn_lbs, t.nem_mcal, t.neg_mcal, t.cp_lbs, t.ca_g, t.p_g
        )?;
        writeln!(f)?;

        if !self.menu.unavailable().is_empty() {
            writeln!(
                f,
                "Excluded as unavailable: {}",
                self.menu.unavailable().join(", ")
            )?;
            writeln!(f)?;
        }
        Ok(())
    }

    fn write_comparison(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pct = self.menu.tolerance() * 100.0;
        writeln!(f, "## Requirements Check (within {pct:.0}%)")?;
        writeln!(f)?;
        writeln!(f, "| Nutrient | Target | Provided | Difference | Status |")?;
        writeln!(f, "|---|---:|---:|---:|:---:|")?;
        for check in self.menu.checks() {
            let mark = if check.within_tolerance { "✓" } else { "✗" };
            let note = if check.enforced { "" } else { " (info)" };
            writeln!(
                f,
                "| {} ({}) | {:.2} | {:.2} | {:+.2} | {}{} |",
                check.nutrient,
                check.unit,
                check.required,
                check.provided,
                check.provided - check.required,
                mark,
                note
            )?;
        }
        writeln!(f)?;
        if self.menu.meets_requirements() {
            writeln!(
                f,
                "The ration meets dry matter, energy and protein targets within {pct:.0}%."
            )?;
        } else {
            writeln!(
                f,
                "The ration misses at least one dry matter, energy or protein target by more than {pct:.0}%; \
                 review the rows marked ✗ with a nutritionist."
            )?;
        }
        writeln!(f)
    }

    fn write_guidelines(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## Feeding Guidelines")?;
        writeln!(f)?;
        for line in GUIDELINES {
            writeln!(f, "- {line}")?;
        }
        Ok(())
    }
}

impl fmt::Display for FeedReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# Cattle Feed Recommendation")?;
        writeln!(f)?;
        self.write_cattle_info(f)?;
        self.write_requirements(f)?;
        self.write_feed_table(f)?;
        self.write_comparison(f)?;
        self.write_guidelines(f)
    }
}

/// Render the report as a markdown string
pub fn format_report(info: &CattleInfo, prediction: &NutritionPrediction, menu: &FeedMenu) -> String {
    FeedReport::new(info, prediction, menu).to_string()
}
