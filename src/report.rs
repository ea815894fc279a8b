//! Answers to ledger queries
//!
//! Responses serialize to the same JSON shapes for every query:
//! `{"day": 1, "ice_amount": 585}` for material and
//! `{"day": 1, "cost": 1111500}` for money, with `"day": null` for the
//! whole build.

use crate::config::Query;
use crate::ledger::Ledger;
use crate::partition::{Day, ProfileId};
use serde::Serialize;

/// Material added on a day
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AmountResponse {
    pub day: Day,
    pub ice_amount: u64,
}

/// Cost of a day, or of the whole build when `day` is `None`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CostResponse {
    pub day: Option<Day>,
    pub cost: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum QueryResponse {
    Amount(AmountResponse),
    Cost(CostResponse),
}

impl QueryResponse {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Run `query` against `ledger`
pub fn answer(ledger: &Ledger, query: &Query) -> QueryResponse {
    match *query {
        Query::Amount { profile, day } => QueryResponse::Amount(AmountResponse {
            day,
            ice_amount: ledger.amount(ProfileId::new(profile), day),
        }),
        Query::Cost {
            day,
            profile: Some(profile),
        } => QueryResponse::Cost(CostResponse {
            day: Some(day),
            cost: ledger.cost(ProfileId::new(profile), day),
        }),
        Query::Cost { day, profile: None } => QueryResponse::Cost(CostResponse {
            day: Some(day),
            cost: ledger.day_cost(day),
        }),
        Query::Overall => QueryResponse::Cost(CostResponse {
            day: None,
            cost: ledger.total_cost(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::CostModel;

    fn ledger() -> Ledger {
        let mut ledger = Ledger::new(CostModel::default());
        for _ in 0..3 {
            ledger.record(ProfileId::new(1), 1);
        }
        ledger.record(ProfileId::new(2), 1);
        ledger
    }

    #[test]
    fn test_answer_json_shapes() {
        let ledger = ledger();

        let json = answer(&ledger, &Query::Amount { profile: 1, day: 1 })
            .to_json()
            .unwrap();
        assert_eq!(json, r#"{"day":1,"ice_amount":585}"#);

        let json = answer(
            &ledger,
            &Query::Cost {
                day: 1,
                profile: Some(1),
            },
        )
        .to_json()
        .unwrap();
        assert_eq!(json, r#"{"day":1,"cost":1111500}"#);

        let json = answer(&ledger, &Query::Cost { day: 1, profile: None })
            .to_json()
            .unwrap();
        assert_eq!(json, r#"{"day":1,"cost":1482000}"#);

        let json = answer(&ledger, &Query::Overall).to_json().unwrap();
        assert_eq!(json, r#"{"day":null,"cost":1482000}"#);
    }

    #[test]
    fn test_unknown_keys_answer_zero() {
        let ledger = ledger();
        assert_eq!(
            answer(&ledger, &Query::Amount { profile: 99, day: 1 }),
            QueryResponse::Amount(AmountResponse {
                day: 1,
                ice_amount: 0
            })
        );
        assert_eq!(
            answer(
                &ledger,
                &Query::Cost {
                    day: 999,
                    profile: Some(1)
                }
            ),
            QueryResponse::Cost(CostResponse {
                day: Some(999),
                cost: 0
            })
        );
    }
}
