// src/revisions/validators.rs

use std::sync::OnceLock;

use super::models::GetRevisionListReq;
use crate::common::validation::{FieldTag, Rule, RuleSet, Validate};

impl Validate for GetRevisionListReq {
    fn rules() -> &'static RuleSet<Self> {
        static RULES: OnceLock<RuleSet<GetRevisionListReq>> = OnceLock::new();
        RULES.get_or_init(|| {
            RuleSet::<GetRevisionListReq>::new("GetRevisionListReq").field(
                FieldTag::new("object_id").form("object_id"),
                &[Rule::Required, Rule::Max(64)],
                |r| (&r.object_id).into(),
            )
        })
    }
}
