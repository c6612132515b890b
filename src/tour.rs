//==============================================================================
// The tour: every storage area, in order
//==============================================================================

use crate::car::Car;
use crate::counter::RaceContext;
use crate::error::Result;
use crate::mapped::{self, MappedRegion};
use crate::thread_slot::{self, ThreadObservation};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

pub const WORKER_COUNT: usize = 2;

/// Fixed values the tour runs with.
#[derive(Debug, Clone, PartialEq)]
pub struct TourSettings {
    pub lap_count: u32,
    pub driver: String,
    pub driver_horse_power: i32,
    pub model: String,
    pub model_horse_power: i32,
    pub winner: String,
    pub region_name: String,
    pub region_size: usize,
    /// `None` places the region in the platform shared-memory directory.
    pub region_dir: Option<PathBuf>,
    pub race_result: i32,
}

impl Default for TourSettings {
    fn default() -> Self {
        TourSettings {
            lap_count: 5,
            driver: "Lewis Hamilton".to_string(),
            driver_horse_power: 1000,
            model: "Ferrari".to_string(),
            model_horse_power: 980,
            winner: "Lewis Hamilton".to_string(),
            region_name: mapped::REGION_NAME.to_string(),
            region_size: mapped::REGION_SIZE,
            region_dir: None,
            race_result: 12345,
        }
    }
}

/// What a finished tour observed.
#[derive(Debug, Clone, PartialEq)]
pub struct TourSummary {
    pub race_count: u32,
    pub observations: Vec<ThreadObservation>,
    pub race_result: i32,
}

pub struct Tour {
    settings: TourSettings,
    races: RaceContext,
}

impl Tour {
    pub fn new(settings: TourSettings) -> Self {
        Self::with_context(settings, RaceContext::global())
    }

    pub fn with_context(settings: TourSettings, races: RaceContext) -> Self {
        Tour { settings, races }
    }

    pub fn run<W: Write + Send>(&self, out: &mut W) -> Result<TourSummary> {
        let s = &self.settings;

        // Stack
        let lap_count = s.lap_count;
        writeln!(out, "Total laps: {lap_count}")?;

        // Heap
        let driver = Box::new(Car::from_driver(s.driver.as_str(), s.driver_horse_power));
        let model = Box::new(Car::from_model(s.model.as_str(), s.model_horse_power, true));
        writeln!(
            out,
            "{} is driving a {} with {} horsepower is available for a driver",
            driver.driver(),
            model.model(),
            model.horse_power()
        )?;

        // Static
        let race_count = self.races.start_race();
        writeln!(out, "Race counter: {race_count}")?;

        let winner = s.winner.clone();
        writeln!(out, "The winner is {winner}")?;

        // Thread-local
        let observations = self.show_thread_locals(out)?;

        // Memory-mapped file
        let race_result = self.show_mapped_region(out)?;

        writeln!(out, "Releasing heap allocations...")?;
        drop(driver);
        drop(model);
        drop(winner);
        writeln!(out, "Heap allocations released.")?;

        Ok(TourSummary {
            race_count,
            observations,
            race_result,
        })
    }

    fn show_thread_locals<W: Write + Send>(&self, out: &mut W) -> Result<Vec<ThreadObservation>> {
        let sink = Mutex::new(&mut *out);
        thread_slot::observe_workers(WORKER_COUNT, |_ctx, observation| {
            let mut out = sink.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            writeln!(out, "{}", observation.line())
        })
    }

    fn show_mapped_region<W: Write>(&self, out: &mut W) -> Result<i32> {
        let s = &self.settings;
        let region = match &s.region_dir {
            Some(dir) => MappedRegion::create_new(dir, &s.region_name, s.region_size)?,
            None => MappedRegion::create(&s.region_name, s.region_size)?,
        };

        let mut writer = region.write_view()?;
        writer.write_i32(0, s.race_result)?;
        writer.close()?;
        writeln!(out, "Race result written to memory-mapped file.")?;

        let reader = region.read_view()?;
        let race_result = reader.read_i32(0)?;
        reader.close();
        writeln!(out, "Race result read from memory-mapped file: {race_result}")?;

        region.release()?;
        Ok(race_result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TourError;
    use std::collections::HashSet;
    use std::sync::atomic::AtomicU32;
    use tempfile::tempdir;

    fn run_isolated(settings: TourSettings) -> (Result<TourSummary>, Vec<String>) {
        let counter = Box::leak(Box::new(AtomicU32::new(0)));
        let tour = Tour::with_context(settings, RaceContext::from_counter(counter));

        let mut out = Vec::new();
        let result = tour.run(&mut out);
        let lines = String::from_utf8(out)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect();
        (result, lines)
    }

    fn settings_in(dir: &std::path::Path) -> TourSettings {
        TourSettings {
            region_dir: Some(dir.to_path_buf()),
            ..TourSettings::default()
        }
    }

    #[test]
    fn test_end_to_end_output() {
        let dir = tempdir().unwrap();
        let (result, lines) = run_isolated(settings_in(dir.path()));
        let summary = result.unwrap();

        assert_eq!(summary.race_count, 1);
        assert_eq!(summary.race_result, 12345);
        assert_eq!(lines.len(), 10);

        assert_eq!(lines[0], "Total laps: 5");
        assert_eq!(
            lines[1],
            "Lewis Hamilton is driving a Ferrari with 980 horsepower is available for a driver"
        );
        assert_eq!(lines[2], "Race counter: 1");
        assert_eq!(lines[3], "The winner is Lewis Hamilton");

        let thread_lines: HashSet<_> = lines[4..6].iter().cloned().collect();
        let expected: HashSet<_> = summary.observations.iter().map(ThreadObservation::line).collect();
        assert_eq!(thread_lines, expected);
        assert_eq!(thread_lines.len(), 2);

        assert_eq!(lines[6], "Race result written to memory-mapped file.");
        assert_eq!(lines[7], "Race result read from memory-mapped file: 12345");
        assert_eq!(lines[8], "Releasing heap allocations...");
        assert_eq!(lines[9], "Heap allocations released.");
        assert!(!lines.iter().any(|line| line.contains("Formula 1")));

        assert!(!dir.path().join(mapped::REGION_NAME).exists());
    }

    #[test]
    fn test_existing_region_fails_fast() {
        let dir = tempdir().unwrap();
        let _held = MappedRegion::create_new(dir.path(), mapped::REGION_NAME, mapped::REGION_SIZE).unwrap();

        let (result, lines) = run_isolated(settings_in(dir.path()));

        assert!(matches!(result, Err(TourError::RegionExists { .. })));
        assert!(!lines.iter().any(|line| line.starts_with("Race result")));
    }

    #[test]
    fn test_region_released_on_failure() {
        let dir = tempdir().unwrap();
        let settings = TourSettings {
            region_size: 2,
            ..settings_in(dir.path())
        };

        let (result, _) = run_isolated(settings);

        assert!(matches!(result, Err(TourError::OutOfBounds { .. })));
        assert!(!dir.path().join(mapped::REGION_NAME).exists());
    }

    #[test]
    fn test_default_settings() {
        let settings = TourSettings::default();
        assert_eq!(settings.lap_count, 5);
        assert_eq!(settings.region_name, "RaceResults");
        assert_eq!(settings.region_size, 1024);
        assert_eq!(settings.race_result, 12345);
        assert!(settings.region_dir.is_none());
    }
}
