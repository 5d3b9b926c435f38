//! Pure post-processing of the grouped rows the database returns.

use std::cmp::Ordering;

use chrono::{Duration, NaiveDate};
use sqlx::FromRow;
use uuid::Uuid;

use crate::features::analytics::dtos::{
    CategoryByZoneDto, CategoryHighLowDto, CategoryShareDto, CategoryValueDto, EcoPointsDayDto,
    WasteCategory, ZoneTotalDto,
};
use crate::features::reports::models::ReportStatus;
use crate::shared::constants::{DEFAULT_TOP_ZONES_LIMIT, ECO_POINTS_WINDOW_DAYS};

const MAX_TOP_ZONES_LIMIT: i64 = 100;

/// Per-zone sums as grouped by the database
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct ZoneRollup {
    pub zone_id: Uuid,
    pub zone_name: String,
    pub wet_kg: f64,
    pub dry_kg: f64,
    pub plastic_kg: f64,
    pub e_waste_kg: f64,
    pub count: i64,
}

impl ZoneRollup {
    pub fn total(&self) -> f64 {
        self.wet_kg + self.dry_kg + self.plastic_kg + self.e_waste_kg
    }

    fn breakdown(&self) -> Vec<CategoryValueDto> {
        CategoryTotals {
            wet_kg: self.wet_kg,
            dry_kg: self.dry_kg,
            plastic_kg: self.plastic_kg,
            e_waste_kg: self.e_waste_kg,
        }
        .values()
    }
}

/// All-time sums per category
#[derive(Debug, Clone, Copy, Default, PartialEq, FromRow)]
pub struct CategoryTotals {
    pub wet_kg: f64,
    pub dry_kg: f64,
    pub plastic_kg: f64,
    pub e_waste_kg: f64,
}

impl CategoryTotals {
    pub fn get(&self, category: WasteCategory) -> f64 {
        match category {
            WasteCategory::Wet => self.wet_kg,
            WasteCategory::Dry => self.dry_kg,
            WasteCategory::Plastic => self.plastic_kg,
            WasteCategory::EWaste => self.e_waste_kg,
        }
    }

    pub fn total(&self) -> f64 {
        WasteCategory::ALL.iter().map(|c| self.get(*c)).sum()
    }

    fn values(&self) -> Vec<CategoryValueDto> {
        WasteCategory::ALL
            .iter()
            .map(|&category| CategoryValueDto {
                category,
                value: self.get(category),
            })
            .collect()
    }
}

/// Summed weight of one status on one local calendar day
#[derive(Debug, Clone, PartialEq)]
pub struct DailyStatusTotal {
    pub day: NaiveDate,
    pub status: ReportStatus,
    pub total_kg: f64,
}

fn by_total_desc(a: &ZoneRollup, b: &ZoneRollup) -> Ordering {
    b.total().partial_cmp(&a.total()).unwrap_or(Ordering::Equal)
}

pub fn zone_totals(mut rows: Vec<ZoneRollup>) -> Vec<ZoneTotalDto> {
    rows.sort_by(by_total_desc);
    rows.into_iter()
        .map(|row| ZoneTotalDto {
            total_waste: row.total(),
            zone_id: row.zone_id,
            zone_name: row.zone_name,
            wet_kg: row.wet_kg,
            dry_kg: row.dry_kg,
            plastic_kg: row.plastic_kg,
            e_waste_kg: row.e_waste_kg,
            count: row.count,
        })
        .collect()
}

pub fn category_by_zone(rows: Vec<ZoneRollup>) -> Vec<CategoryByZoneDto> {
    rows.into_iter()
        .map(|row| CategoryByZoneDto {
            zone_id: row.zone_id,
            zone_name: row.zone_name,
            wet_kg: row.wet_kg,
            dry_kg: row.dry_kg,
            plastic_kg: row.plastic_kg,
            e_waste_kg: row.e_waste_kg,
        })
        .collect()
}

/// Clamp a caller supplied limit, falling back to the default when absent
pub fn clamp_top_zones_limit(limit: Option<i64>) -> usize {
    limit
        .unwrap_or(DEFAULT_TOP_ZONES_LIMIT)
        .clamp(1, MAX_TOP_ZONES_LIMIT) as usize
}

pub fn top_zones(rows: Vec<ZoneRollup>, limit: Option<i64>) -> Vec<ZoneTotalDto> {
    let mut totals = zone_totals(rows);
    totals.truncate(clamp_top_zones_limit(limit));
    totals
}

/// Highest and lowest category per zone. Only a strictly better value
/// displaces the current pick, so ties stay with the earlier category.
pub fn category_high_low(rows: Vec<ZoneRollup>) -> Vec<CategoryHighLowDto> {
    rows.into_iter()
        .map(|row| {
            let breakdown = row.breakdown();
            let mut highest = breakdown[0];
            let mut lowest = breakdown[0];
            for entry in &breakdown[1..] {
                if entry.value > highest.value {
                    highest = *entry;
                }
                if entry.value < lowest.value {
                    lowest = *entry;
                }
            }

            CategoryHighLowDto {
                zone_id: row.zone_id,
                zone_name: row.zone_name,
                highest,
                lowest,
                breakdown,
            }
        })
        .collect()
}

/// First day of the eco points window ending on `today`
pub fn eco_points_window_start(today: NaiveDate) -> NaiveDate {
    today - Duration::days(ECO_POINTS_WINDOW_DAYS - 1)
}

/// One entry per day of the window, oldest first, with empty days zeroed
pub fn eco_points(today: NaiveDate, rows: &[DailyStatusTotal]) -> Vec<EcoPointsDayDto> {
    let start = eco_points_window_start(today);

    (0..ECO_POINTS_WINDOW_DAYS)
        .map(|offset| {
            let date = start + Duration::days(offset);
            let sum_for = |status: ReportStatus| -> f64 {
                rows.iter()
                    .filter(|row| row.day == date && row.status == status)
                    .map(|row| row.total_kg)
                    .sum()
            };
            let positive = sum_for(ReportStatus::Collected);
            let negative = sum_for(ReportStatus::Cancelled).abs();

            EcoPointsDayDto {
                date,
                positive,
                negative,
                net: positive - negative,
            }
        })
        .collect()
}

pub fn top_categories(totals: CategoryTotals) -> Vec<CategoryShareDto> {
    let grand_total = totals.total();

    let mut shares: Vec<CategoryShareDto> = WasteCategory::ALL
        .iter()
        .map(|&category| {
            let total_kg = totals.get(category);
            let percentage = if grand_total > 0.0 {
                (total_kg / grand_total * 100.0).round() as i64
            } else {
                0
            };
            CategoryShareDto {
                category,
                total_kg,
                percentage,
            }
        })
        .collect();

    // sort_by is stable, so equal percentages keep the fixed order
    shares.sort_by(|a, b| b.percentage.cmp(&a.percentage));
    shares
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zone(name: &str, wet: f64, dry: f64, plastic: f64, e_waste: f64) -> ZoneRollup {
        ZoneRollup {
            zone_id: Uuid::new_v4(),
            zone_name: name.to_string(),
            wet_kg: wet,
            dry_kg: dry,
            plastic_kg: plastic,
            e_waste_kg: e_waste,
            count: 1,
        }
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_zone_totals_sorted_by_total_desc() {
        let rows = vec![
            zone("Small", 1.0, 0.0, 0.0, 0.0),
            zone("Large", 5.0, 5.0, 1.0, 0.0),
            zone("Medium", 2.0, 2.0, 0.0, 0.5),
        ];

        let totals = zone_totals(rows);
        let names: Vec<&str> = totals.iter().map(|t| t.zone_name.as_str()).collect();
        assert_eq!(names, vec!["Large", "Medium", "Small"]);
        assert_eq!(totals[0].total_waste, 11.0);
        assert_eq!(totals[1].total_waste, 4.5);
    }

    #[test]
    fn test_zone_totals_add_up_to_grand_total() {
        let rows = vec![
            zone("A", 1.25, 0.5, 0.0, 2.0),
            zone("B", 0.0, 3.0, 1.5, 0.0),
            zone("C", 4.0, 0.0, 0.0, 0.25),
        ];
        let grand_total: f64 = rows.iter().map(ZoneRollup::total).sum();

        let summed: f64 = zone_totals(rows).iter().map(|t| t.total_waste).sum();
        assert!((summed - grand_total).abs() < 1e-9);
    }

    #[test]
    fn test_category_by_zone_keeps_sums() {
        let result = category_by_zone(vec![zone("A", 1.0, 2.0, 3.0, 4.0)]);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].plastic_kg, 3.0);
        assert_eq!(result[0].e_waste_kg, 4.0);
    }

    #[test]
    fn test_top_zones_limit_is_clamped() {
        assert_eq!(clamp_top_zones_limit(None), DEFAULT_TOP_ZONES_LIMIT as usize);
        assert_eq!(clamp_top_zones_limit(Some(0)), 1);
        assert_eq!(clamp_top_zones_limit(Some(-3)), 1);
        assert_eq!(clamp_top_zones_limit(Some(500)), 100);

        let rows = vec![
            zone("A", 1.0, 0.0, 0.0, 0.0),
            zone("B", 3.0, 0.0, 0.0, 0.0),
            zone("C", 2.0, 0.0, 0.0, 0.0),
        ];
        let top = top_zones(rows, Some(2));
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].zone_name, "B");
        assert_eq!(top[1].zone_name, "C");
    }

    #[test]
    fn test_high_low_picks_extremes() {
        let result = category_high_low(vec![zone("A", 2.0, 9.0, 0.5, 4.0)]);
        assert_eq!(result[0].highest.category, WasteCategory::Dry);
        assert_eq!(result[0].highest.value, 9.0);
        assert_eq!(result[0].lowest.category, WasteCategory::Plastic);
        assert_eq!(result[0].breakdown.len(), 4);
    }

    #[test]
    fn test_high_low_ties_go_to_first_category() {
        let result = category_high_low(vec![zone("A", 3.0, 3.0, 1.0, 1.0)]);
        assert_eq!(result[0].highest.category, WasteCategory::Wet);
        assert_eq!(result[0].lowest.category, WasteCategory::Plastic);

        let all_zero = category_high_low(vec![zone("B", 0.0, 0.0, 0.0, 0.0)]);
        assert_eq!(all_zero[0].highest.category, WasteCategory::Wet);
        assert_eq!(all_zero[0].lowest.category, WasteCategory::Wet);
    }

    #[test]
    fn test_eco_points_fills_seven_days() {
        let today = date("2025-03-10");
        let rows = vec![
            DailyStatusTotal {
                day: date("2025-03-10"),
                status: ReportStatus::Collected,
                total_kg: 4.0,
            },
            DailyStatusTotal {
                day: date("2025-03-10"),
                status: ReportStatus::Cancelled,
                total_kg: 1.5,
            },
            DailyStatusTotal {
                day: date("2025-03-05"),
                status: ReportStatus::Collected,
                total_kg: 2.0,
            },
            DailyStatusTotal {
                day: date("2025-03-01"),
                status: ReportStatus::Collected,
                total_kg: 100.0,
            },
        ];

        let points = eco_points(today, &rows);
        assert_eq!(points.len(), 7);
        assert_eq!(points[0].date, date("2025-03-04"));
        assert_eq!(points[6].date, today);

        assert_eq!(points[1].positive, 2.0);
        assert_eq!(points[1].net, 2.0);

        assert_eq!(points[6].positive, 4.0);
        assert_eq!(points[6].negative, 1.5);
        assert_eq!(points[6].net, 2.5);

        assert!(points[2..6].iter().all(|p| p.positive == 0.0 && p.negative == 0.0));
    }

    #[test]
    fn test_top_categories_percentages() {
        let shares = top_categories(CategoryTotals {
            wet_kg: 10.0,
            dry_kg: 20.0,
            plastic_kg: 10.0,
            e_waste_kg: 0.0,
        });

        let order: Vec<WasteCategory> = shares.iter().map(|s| s.category).collect();
        assert_eq!(
            order,
            vec![
                WasteCategory::Dry,
                WasteCategory::Wet,
                WasteCategory::Plastic,
                WasteCategory::EWaste
            ]
        );
        assert_eq!(shares[0].percentage, 50);
        assert_eq!(shares[1].percentage, 25);
        assert_eq!(shares[3].percentage, 0);
    }

    #[test]
    fn test_top_categories_zero_total() {
        let shares = top_categories(CategoryTotals::default());
        assert_eq!(shares.len(), 4);
        assert!(shares.iter().all(|s| s.percentage == 0));
        assert_eq!(shares[0].category, WasteCategory::Wet);
        assert_eq!(shares[3].category, WasteCategory::EWaste);
    }

    #[test]
    fn test_top_categories_rounds_to_nearest() {
        let shares = top_categories(CategoryTotals {
            wet_kg: 1.0,
            dry_kg: 1.0,
            plastic_kg: 1.0,
            e_waste_kg: 0.0,
        });
        assert!(shares[..3].iter().all(|s| s.percentage == 33));
    }
}
