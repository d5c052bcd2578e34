mod dashboard;
mod upload;

use std::path::Path;

use tempfile::TempDir;
use vehicle_explorer::config::{AppConfig, SAMPLE_DATASET_FILE};
use vehicle_explorer::dashboard::Dashboard;

pub const VEHICLES_CSV: &str = "\
price,odometer,model_year,condition,fuel,model
12000,60000,2012,good,gas,sedan
8000,120000,2009,fair,gas,pickup
15000,45000,2015,like new,gas,sedan
5000,180000,2005,salvage,diesel,suv
22000,30000,2018,excellent,gas,suv
17000,80000,2014,good,gas,sedan
9000,110000,2010,good,hybrid,hatchback
13000,65000,2013,fair,gas,pickup
27000,25000,2019,excellent,electric,sedan
7000,140000,2007,fair,gas,suv
";

/// A data directory holding the bundled sample file.
pub fn data_dir_with(contents: &str) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join(SAMPLE_DATASET_FILE), contents).unwrap();
    dir
}

pub fn dashboard_for(dir: &Path) -> Dashboard {
    Dashboard::new(AppConfig {
        data_dir: dir.to_path_buf(),
        ..AppConfig::default()
    })
}
