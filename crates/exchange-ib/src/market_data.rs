//! Contract definitions and last-price snapshots.

use options_tracker_core::{ContractDetail, MarketSnapshot};
use tracing::debug;

use crate::client::IbGateway;
use crate::error::Result;
use crate::types::SecDefResponse;

/// Snapshot field carrying the last traded price.
pub const LAST_PRICE_FIELD: &str = "31";

fn join_conids(conids: &[i64]) -> String {
    conids
        .iter()
        .map(i64::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

impl IbGateway {
    /// Security definitions for `conids`, in one request.
    pub async fn contract_details(&self, conids: &[i64]) -> Result<Vec<ContractDetail>> {
        if conids.is_empty() {
            return Ok(Vec::new());
        }
        let response: SecDefResponse = self
            .get_with_query("trsrv/secdef", &[("conids", join_conids(conids))])
            .await?;
        debug!(
            requested = conids.len(),
            received = response.secdef.len(),
            "Fetched contract definitions"
        );
        Ok(response.secdef)
    }

    /// Last-price snapshots for `conids`, in one request.
    ///
    /// The gateway only streams fields for conids it has been asked about
    /// before, so a first call after login may come back without field 31.
    pub async fn market_snapshot(&self, conids: &[i64]) -> Result<Vec<MarketSnapshot>> {
        if conids.is_empty() {
            return Ok(Vec::new());
        }
        let snapshots: Vec<MarketSnapshot> = self
            .get_with_query(
                "iserver/marketdata/snapshot",
                &[
                    ("conids", join_conids(conids)),
                    ("fields", LAST_PRICE_FIELD.to_string()),
                ],
            )
            .await?;
        debug!(
            requested = conids.len(),
            received = snapshots.len(),
            "Fetched market snapshot"
        );
        Ok(snapshots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::tests::gateway;
    use rust_decimal_macros::dec;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn conids_are_comma_joined() {
        assert_eq!(join_conids(&[1, 22, 333]), "1,22,333");
        assert_eq!(join_conids(&[]), "");
    }

    #[tokio::test]
    async fn secdef_unwraps_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/api/trsrv/secdef"))
            .and(query_param("conids", "495512563,756733"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "secdef": [
                    {
                        "conid": 495512563,
                        "ticker": "SPY",
                        "assetClass": "OPT",
                        "expiry": "20260417",
                        "strike": 500,
                        "putOrCall": "P",
                        "multiplier": 100,
                        "undConid": 756733
                    },
                    {"conid": 756733, "ticker": "SPY", "assetClass": "STK"}
                ]
            })))
            .mount(&server)
            .await;

        let details = gateway(&server)
            .contract_details(&[495512563, 756733])
            .await
            .unwrap();

        assert_eq!(details.len(), 2);
        assert_eq!(details[0].strike, Some(dec!(500)));
        assert_eq!(details[0].und_conid, Some(756733));
        assert!(details[1].expiry.is_none());
    }

    #[tokio::test]
    async fn snapshot_requests_last_price_field() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/api/iserver/marketdata/snapshot"))
            .and(query_param("conids", "1,2"))
            .and(query_param("fields", "31"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"conid": 1, "conidEx": "1", "31": "C3.40", "_updated": 1712345678000_i64},
                {"conid": 2, "31": "512.10"}
            ])))
            .mount(&server)
            .await;

        let snapshots = gateway(&server).market_snapshot(&[1, 2]).await.unwrap();

        assert_eq!(snapshots.len(), 2);
        assert_eq!(snapshots[0].last_price().unwrap(), dec!(3.40));
        assert_eq!(snapshots[1].last_price().unwrap(), dec!(512.10));
    }

    #[tokio::test]
    async fn empty_request_skips_the_wire() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;

        let gw = gateway(&server);
        assert!(gw.contract_details(&[]).await.unwrap().is_empty());
        assert!(gw.market_snapshot(&[]).await.unwrap().is_empty());
    }
}
