//! Case table contract
//!
//! The store owns the table; these statements describe the layout the
//! generated queries expect.

pub const CASE_TABLE: &str = "grinding_cases";

/// Index named in the optimizer hint of pre-filtered queries
pub const COMPOSITE_INDEX: &str = "idx_material_time_composite";

pub(crate) const EUCLIDEAN_COLUMNS: &str = "case_id, material_type, original_grinding_time, \
     grinding_speed, grinding_pressure, media_type, create_time";

pub(crate) const RESULT_COLUMNS: &str = "case_id, material_type, original_grinding_time, \
     grinding_speed, grinding_pressure, media_type, media_ratio, additive_type, create_time";

pub(crate) const COMPREHENSIVE_COLUMNS: &str = "case_id, material_type, original_grinding_time, \
     grinding_speed, grinding_pressure, media_type, media_ratio, additive_type, \
     surface_roughness_before, surface_roughness_after, create_time";

pub const CREATE_TABLE: &str = "CREATE TABLE grinding_cases (
  case_id VARCHAR(50) PRIMARY KEY,
  material_type VARCHAR(100) NOT NULL,
  original_grinding_time DECIMAL(8,2) NOT NULL,
  grinding_speed INT NOT NULL,
  grinding_pressure DECIMAL(6,2) NOT NULL,
  media_type VARCHAR(50),
  media_ratio VARCHAR(20),
  additive_type VARCHAR(50),
  diameter DECIMAL(8,3),
  thickness DECIMAL(8,3),
  length DECIMAL(8,3),
  weight DECIMAL(8,3),
  hardness INT,
  surface_roughness_before DECIMAL(6,3),
  surface_roughness_after DECIMAL(6,3),
  dimensional_precision VARCHAR(20),
  precision_requirement VARCHAR(20),
  surface_quality_requirement VARCHAR(50),
  deburring_requirement BOOLEAN DEFAULT FALSE,
  create_time TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
  update_time TIMESTAMP DEFAULT CURRENT_TIMESTAMP ON UPDATE CURRENT_TIMESTAMP,
  source VARCHAR(50) DEFAULT 'manual',
  quality_score DECIMAL(3,2) DEFAULT 1.0,
  INDEX idx_material_time (material_type, original_grinding_time),
  INDEX idx_features (grinding_speed, grinding_pressure, hardness),
  INDEX idx_quality (surface_roughness_before, dimensional_precision)
) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4 COLLATE=utf8mb4_unicode_ci";

pub const INDEX_STATEMENTS: [&str; 5] = [
    "CREATE INDEX idx_material_time_composite ON grinding_cases (material_type, original_grinding_time, create_time)",
    "CREATE INDEX idx_similarity_features ON grinding_cases (grinding_speed, grinding_pressure, surface_roughness_before)",
    "CREATE INDEX idx_dimensional_features ON grinding_cases (dimensional_precision, hardness)",
    "CREATE UNIQUE INDEX idx_case_id ON grinding_cases (case_id)",
    "CREATE INDEX idx_create_time_desc ON grinding_cases (create_time DESC)",
];

/// Yearly range partitions on `create_time`
pub const PARTITION_STATEMENT: &str = "ALTER TABLE grinding_cases PARTITION BY RANGE (YEAR(create_time)) (
  PARTITION p2022 VALUES LESS THAN (2023),
  PARTITION p2023 VALUES LESS THAN (2024),
  PARTITION p2024 VALUES LESS THAN (2025),
  PARTITION p_future VALUES LESS THAN MAXVALUE
)";

/// Everything needed to prepare an empty store, in execution order
pub fn setup_statements() -> Vec<&'static str> {
    std::iter::once(CREATE_TABLE)
        .chain(INDEX_STATEMENTS)
        .chain(std::iter::once(PARTITION_STATEMENT))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_order() {
        let statements = setup_statements();
        assert_eq!(statements.len(), 7);
        assert!(statements[0].starts_with("CREATE TABLE grinding_cases"));
        assert!(statements[6].starts_with("ALTER TABLE"));
    }

    #[test]
    fn test_hint_index_is_declared() {
        assert!(INDEX_STATEMENTS.iter().any(|s| s.contains(COMPOSITE_INDEX)));
    }

    #[test]
    fn test_result_columns_exist_in_table() {
        for columns in [EUCLIDEAN_COLUMNS, RESULT_COLUMNS, COMPREHENSIVE_COLUMNS] {
            for column in columns.split(',').map(str::trim) {
                assert!(CREATE_TABLE.contains(&format!("  {} ", column)), "missing {}", column);
            }
        }
    }
}
