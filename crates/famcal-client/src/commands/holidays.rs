//! Holiday listing.

use famcal_core::HolidayRecord;
use famcal_providers::mock;
use famcal_service::DataOrigin;
use serde::Serialize;

use crate::app::App;
use crate::commands::print_json;
use crate::error::ClientResult;
use crate::render;

/// JSON shape of the holiday listing.
#[derive(Debug, Serialize)]
struct HolidayListing<'a> {
    country: &'a str,
    origin: Option<DataOrigin>,
    holidays: &'a [HolidayRecord],
}

/// Options of the `holidays` command.
#[derive(Debug, Clone, Copy, Default)]
pub struct HolidayOptions {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub sample: bool,
    pub json: bool,
}

/// Fetches and prints the holidays of the selected country.
///
/// With `sample`, the embedded sample list is shown instead and nothing is
/// fetched or cached.
pub async fn run(app: &App, options: HolidayOptions) -> ClientResult<()> {
    let (origin, records) = if options.sample {
        let records = mock::sample_holidays()?;
        (None, filter_month(records, options.month))
    } else {
        let calendar = app.calendar();
        let origin = match options.year {
            Some(year) => calendar.change_year(app.country(), year).await,
            None => calendar.change_country(app.country()).await,
        };
        let records = match options.month {
            Some(month) => calendar.holidays_in_month(month),
            None => calendar.holidays(),
        };
        (Some(origin), records)
    };

    if options.json {
        return print_json(&HolidayListing {
            country: app.country(),
            origin,
            holidays: &records,
        });
    }

    if let Some(notice) = origin.and_then(|o| render::origin_notice(o, app.country())) {
        eprintln!("{}", notice);
    }
    println!("{}", render::holidays(&records));
    Ok(())
}

fn filter_month(records: Vec<HolidayRecord>, month: Option<u32>) -> Vec<HolidayRecord> {
    match month {
        Some(month) => records
            .into_iter()
            .filter(|h| h.month_number() == month)
            .collect(),
        None => records,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_month_filter() {
        let records = mock::sample_holidays().unwrap();
        let total = records.len();

        let may = filter_month(records.clone(), Some(5));
        assert!(!may.is_empty());
        assert!(may.iter().all(|h| h.month == "05"));
        assert_eq!(filter_month(records, None).len(), total);
    }
}
