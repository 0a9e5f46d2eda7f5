// src/users/validators.rs

use std::sync::OnceLock;

use super::models::{GetUserPageReq, UpdateUserStatusReq, UserStatusFilter};
use crate::common::validation::{FieldTag, Rule, RuleSet, Validate};

impl Validate for UpdateUserStatusReq {
    fn rules() -> &'static RuleSet<Self> {
        static RULES: OnceLock<RuleSet<UpdateUserStatusReq>> = OnceLock::new();
        RULES.get_or_init(|| {
            RuleSet::<UpdateUserStatusReq>::new("UpdateUserStatusReq")
                .field(
                    FieldTag::new("user_id").json("user_id"),
                    &[Rule::Required],
                    |r| (&r.user_id).into(),
                )
                .field(
                    FieldTag::new("status").json("status"),
                    &[Rule::Required, Rule::OneOf(UserStatusFilter::NAMES)],
                    |r| (&r.status).into(),
                )
        })
    }
}

impl Validate for GetUserPageReq {
    fn rules() -> &'static RuleSet<Self> {
        static RULES: OnceLock<RuleSet<GetUserPageReq>> = OnceLock::new();
        RULES.get_or_init(|| {
            RuleSet::<GetUserPageReq>::new("GetUserPageReq")
                .field(FieldTag::new("page").form("page"), &[Rule::Gte(1)], |r| {
                    r.page.into()
                })
                .field(
                    FieldTag::new("page_size").form("page_size"),
                    &[Rule::Gte(1), Rule::Lte(100)],
                    |r| r.page_size.into(),
                )
                .field(
                    FieldTag::new("query").form("query"),
                    &[Rule::Max(100)],
                    |r| (&r.query).into(),
                )
                .field(
                    FieldTag::new("status").form("status"),
                    &[Rule::OneOf(UserStatusFilter::NAMES)],
                    |r| (&r.status).into(),
                )
        })
    }
}
