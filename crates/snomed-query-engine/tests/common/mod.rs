//! Clinical fixture hierarchy shared by the integration tests.
//!
//! ```text
//! 138875005 SNOMED CT Concept
//! ├── 404684003 Clinical finding
//! │   ├── 64572001 Disease
//! │   │   ├── 73211009 Diabetes mellitus          site = 113331007
//! │   │   │   ├── 46635009 Type 1 diabetes         site = 113331007
//! │   │   │   └── 44054006 Type 2 diabetes         site = 113331007, 80891009
//! │   │   └── 56265001 Heart disease              site = 80891009
//! │   │       └── 91434003 Pulmonic valve stenosis site = 39057004
//! │   └── 386661006 Fever
//! ├── 123037004 Body structure
//! │   ├── 39057004 Pulmonary valve structure
//! │   ├── 80891009 Heart structure
//! │   └── 113331007 Endocrine system structure
//! └── 363698007 (unnamed)
//! ```

#![allow(dead_code)]

use snomed_query_index::{ConceptIndexBuilder, MemoryConceptIndex};

pub const ROOT: u64 = 138875005;
pub const CLINICAL_FINDING: u64 = 404684003;
pub const DISEASE: u64 = 64572001;
pub const DIABETES: u64 = 73211009;
pub const TYPE_1_DIABETES: u64 = 46635009;
pub const TYPE_2_DIABETES: u64 = 44054006;
pub const HEART_DISEASE: u64 = 56265001;
pub const PULMONIC_STENOSIS: u64 = 91434003;
pub const FEVER: u64 = 386661006;
pub const BODY_STRUCTURE: u64 = 123037004;
pub const PULMONARY_VALVE: u64 = 39057004;
pub const HEART: u64 = 80891009;
pub const ENDOCRINE_SYSTEM: u64 = 113331007;
pub const FINDING_SITE: u64 = 363698007;

pub fn clinical_index() -> MemoryConceptIndex {
    let mut builder = ConceptIndexBuilder::new();
    builder
        .add_concept(ROOT, "SNOMED CT Concept (SNOMED RT+CTV3)")
        .add_concept(CLINICAL_FINDING, "Clinical finding (finding)")
        .add_concept(DISEASE, "Disease (disorder)")
        .add_concept(DIABETES, "Diabetes mellitus (disorder)")
        .add_concept(TYPE_1_DIABETES, "Diabetes mellitus type 1 (disorder)")
        .add_concept(TYPE_2_DIABETES, "Diabetes mellitus type 2 (disorder)")
        .add_concept(HEART_DISEASE, "Heart disease (disorder)")
        .add_concept(PULMONIC_STENOSIS, "Pulmonic valve stenosis (disorder)")
        .add_concept(FEVER, "Fever (finding)")
        .add_concept(BODY_STRUCTURE, "Body structure (body structure)")
        .add_concept(PULMONARY_VALVE, "Pulmonary valve structure (body structure)")
        .add_concept(HEART, "Heart structure (body structure)")
        .add_concept(ENDOCRINE_SYSTEM, "Structure of endocrine system (body structure)")
        .add_unnamed_concept(FINDING_SITE)
        .add_is_a(CLINICAL_FINDING, ROOT)
        .add_is_a(DISEASE, CLINICAL_FINDING)
        .add_is_a(DIABETES, DISEASE)
        .add_is_a(TYPE_1_DIABETES, DIABETES)
        .add_is_a(TYPE_2_DIABETES, DIABETES)
        .add_is_a(HEART_DISEASE, DISEASE)
        .add_is_a(PULMONIC_STENOSIS, HEART_DISEASE)
        .add_is_a(FEVER, CLINICAL_FINDING)
        .add_is_a(BODY_STRUCTURE, ROOT)
        .add_is_a(PULMONARY_VALVE, BODY_STRUCTURE)
        .add_is_a(HEART, BODY_STRUCTURE)
        .add_is_a(ENDOCRINE_SYSTEM, BODY_STRUCTURE)
        .add_is_a(FINDING_SITE, ROOT)
        .add_attribute(DIABETES, FINDING_SITE, "113331007")
        .add_attribute(TYPE_1_DIABETES, FINDING_SITE, "113331007")
        .add_attribute(TYPE_2_DIABETES, FINDING_SITE, "113331007")
        .add_attribute(TYPE_2_DIABETES, FINDING_SITE, "80891009")
        .add_attribute(HEART_DISEASE, FINDING_SITE, "80891009")
        .add_attribute(PULMONIC_STENOSIS, FINDING_SITE, "39057004");
    builder.build().expect("fixture hierarchy is valid")
}
