//! Company name generation for customers and vendors.
//!
//! Names come from curated word lists, so a seeded run always yields
//! the same roster.

use crate::config::IndustryKey;
use crate::rng::RandomSource;

pub struct NameGenerator;

impl NameGenerator {
    /// A customer name flavoured by who buys from this industry.
    pub fn customer_name(industry: IndustryKey, rng: &mut dyn RandomSource) -> String {
        let trades = match industry {
            IndustryKey::Retail => Self::retail_customer_trades(),
            IndustryKey::Manufacturing => Self::manufacturing_customer_trades(),
            IndustryKey::Saas => Self::saas_customer_trades(),
        };
        Self::company_name(trades, rng)
    }

    /// A vendor name flavoured by the outflow category it supplies.
    pub fn vendor_name(category: &str, rng: &mut dyn RandomSource) -> String {
        Self::company_name(Self::vendor_trades(category), rng)
    }

    /// "Prefix Trade Suffix" or "Surname Trade Suffix".
    fn company_name(trades: &[&str], rng: &mut dyn RandomSource) -> String {
        let trade = Self::pick(trades, rng);
        let suffix = Self::pick(Self::suffixes(), rng);
        if rng.chance(0.5) {
            format!("{} {} {}", Self::pick(Self::prefixes(), rng), trade, suffix)
        } else {
            format!("{} {} {}", Self::pick(Self::surnames(), rng), trade, suffix)
        }
    }

    fn pick<'a>(list: &[&'a str], rng: &mut dyn RandomSource) -> &'a str {
        list[rng.next_u64_below(list.len() as u64) as usize]
    }

    fn vendor_trades(category: &str) -> &'static [&'static str] {
        match category {
            "Payroll" => &["Payroll", "Staffing", "HR"],
            "Rent" => &["Properties", "Realty", "Estates"],
            "Utilities" => &["Power", "Energy", "Water"],
            "Software" => &["Software", "Cloud Apps", "Digital"],
            "Insurance" => &["Insurance", "Assurance", "Mutual"],
            "Cloud Infrastructure" => &["Cloud", "Hosting", "Compute"],
            "Raw Materials" => &["Steel", "Polymers", "Metals", "Chemicals"],
            "Inventory" => &["Wholesale", "Distribution", "Supply"],
            "Marketing" => &["Media", "Advertising", "Creative"],
            "Logistics" => &["Freight", "Logistics", "Transport"],
            "Equipment Maintenance" => &["Machinery", "Industrial Services", "Tooling"],
            _ => &["Services", "Supply", "Trading"],
        }
    }

    fn retail_customer_trades() -> &'static [&'static str] {
        &["Boutique", "Outlet", "Market", "Home Goods", "Apparel", "Gifts"]
    }

    fn manufacturing_customer_trades() -> &'static [&'static str] {
        &["Automotive", "Aerospace", "Construction", "Electronics", "Industrial", "Energy"]
    }

    fn saas_customer_trades() -> &'static [&'static str] {
        &["Analytics", "Health", "Fintech", "Logistics", "Media", "Education"]
    }

    fn prefixes() -> &'static [&'static str] {
        &[
            "Premier", "Summit", "First", "Superior", "Quality", "Northern",
            "Advanced", "Reliable", "Trusted", "Precision", "Metro", "Harbor",
            "Valley", "Mountain", "Coastal", "Central", "United", "Pioneer",
            "National", "Global", "Universal", "Prime", "Keystone", "Bright",
        ]
    }

    fn surnames() -> &'static [&'static str] {
        &[
            "Smith", "Johnson", "Garcia", "Miller", "Davis", "Martinez", "Wilson",
            "Anderson", "Taylor", "Moore", "Jackson", "Lee", "Thompson", "Harris",
            "Clark", "Lewis", "Walker", "Young", "King", "Wright", "Nguyen", "Hill",
            "Baker", "Nelson", "Carter", "Patel", "Chen", "Reyes", "Kim", "Foster",
        ]
    }

    fn suffixes() -> &'static [&'static str] {
        &[
            "LLC", "Inc", "Corp", "Co", "Group", "Partners", "Holdings",
            "Enterprises", "Industries", "Solutions", "Systems", "Ltd",
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{RngBank, StageSlot};

    #[test]
    fn name_generation_is_deterministic() {
        let bank = RngBank::new(12345);
        let name1 = NameGenerator::customer_name(IndustryKey::Retail, &mut bank.for_stage(StageSlot::Partners));
        let name2 = NameGenerator::customer_name(IndustryKey::Retail, &mut bank.for_stage(StageSlot::Partners));
        assert_eq!(name1, name2, "Same seed should produce same name");
    }

    #[test]
    fn generates_three_part_names() {
        let mut rng = RngBank::new(12345).for_stage(StageSlot::Partners);
        for _ in 0..100 {
            let name = NameGenerator::customer_name(IndustryKey::Saas, &mut rng);
            assert!(name.split_whitespace().count() >= 3, "Name too short: {name}");
        }
    }

    #[test]
    fn vendor_names_follow_category() {
        let mut rng = RngBank::new(7).for_stage(StageSlot::Partners);
        for _ in 0..20 {
            let name = NameGenerator::vendor_name("Raw Materials", &mut rng);
            assert!(
                ["Steel", "Polymers", "Metals", "Chemicals"]
                    .iter()
                    .any(|t| name.contains(t)),
                "unexpected raw materials vendor: {name}"
            );
        }
    }
}
