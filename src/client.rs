//! Simulation client
//!
//! Validates parameters locally, then exchanges them for a
//! `SimulationResponse`. Exactly one attempt per call; every failure is final.

use async_trait::async_trait;
use serde::Deserialize;

use crate::consts::{GENERIC_SERVER_ERROR, SIMULATE_PATH};
use crate::error::{ClientResult, SimulationError, ValidationError};
use crate::model::{Mode, SimulationParameters, SimulationResponse};

/// Raw reply of the remote call
#[derive(Debug, Clone, PartialEq)]
pub struct TransportReply {
    pub status: u16,
    pub body: Vec<u8>,
}

impl TransportReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Carries a request to the simulation service.
///
/// Implementations return `SimulationError::Transport` when no reply was
/// received at all; any reply, whatever its status, is `Ok`.
#[async_trait(?Send)]
pub trait SimulationTransport {
    async fn post_simulate(&self, request: &SimulationParameters) -> ClientResult<TransportReply>;
}

/// HTTP transport backed by reqwest (browser fetch on wasm32)
#[derive(Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    pub base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn simulate_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), SIMULATE_PATH)
    }
}

#[async_trait(?Send)]
impl SimulationTransport for HttpTransport {
    async fn post_simulate(&self, request: &SimulationParameters) -> ClientResult<TransportReply> {
        let res = self
            .http
            .post(self.simulate_url())
            .json(request)
            .send()
            .await
            .map_err(|err| SimulationError::Transport(err.to_string()))?;
        let status = res.status().as_u16();

        let body = res
            .bytes()
            .await
            .map_err(|err| SimulationError::Transport(err.to_string()))?;
        Ok(TransportReply {
            status,
            body: body.to_vec(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Validates and submits simulation requests
#[derive(Clone)]
pub struct SimulationClient<T> {
    transport: T,
}

impl<T: SimulationTransport> SimulationClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Validate `params` for `mode`, then fetch the simulation.
    pub async fn simulate(
        &self,
        params: &SimulationParameters,
        mode: Mode,
    ) -> ClientResult<SimulationResponse> {
        validate(params, mode)?;

        log::info!(
            "Requesting simulation: v={} g={} angles={:?} dt={}",
            params.velocity,
            params.gravity,
            params.angles,
            params.dt
        );
        let reply = self.transport.post_simulate(params).await?;
        decode_reply(&reply, params.angles.len())
    }
}

/// Local checks that run before any remote call
pub fn validate(params: &SimulationParameters, mode: Mode) -> Result<(), ValidationError> {
    if params.angles.iter().any(|a| !a.is_finite()) {
        return Err(ValidationError::NonFiniteAngle);
    }
    match mode {
        Mode::Compare if params.angles.is_empty() => return Err(ValidationError::NoAngles),
        Mode::Throw if params.angles.is_empty() => return Err(ValidationError::MissingAngle),
        Mode::Throw if params.angles.len() > 1 => {
            return Err(ValidationError::TooManyAngles(params.angles.len()));
        }
        _ => {}
    }
    if !params.velocity.is_finite() || params.velocity < 0.0 {
        return Err(ValidationError::InvalidVelocity);
    }
    if !params.gravity.is_finite() || params.gravity <= 0.0 {
        return Err(ValidationError::InvalidGravity);
    }
    if !params.dt.is_finite() || params.dt <= 0.0 {
        return Err(ValidationError::InvalidTimestep);
    }
    Ok(())
}

/// Turn a raw reply into a response or the matching error
pub fn decode_reply(reply: &TransportReply, expected: usize) -> ClientResult<SimulationResponse> {
    if !reply.is_success() {
        let message = serde_json::from_slice::<ErrorBody>(&reply.body)
            .ok()
            .map(|payload| payload.error)
            .filter(|msg| !msg.trim().is_empty())
            .unwrap_or_else(|| GENERIC_SERVER_ERROR.to_string());
        log::warn!("Simulation rejected ({}): {}", reply.status, message);
        return Err(SimulationError::Server(message));
    }

    let response: SimulationResponse = serde_json::from_slice(&reply.body).map_err(|err| {
        log::warn!("Undecodable simulation response: {}", err);
        SimulationError::Server("malformed simulation response".to_string())
    })?;
    response.check(expected)?;
    Ok(response)
}

/// Parse a comma separated angle list ("30, 45,60").
///
/// Blank entries are skipped; anything else must be a finite number.
pub fn parse_angles(input: &str) -> Result<Vec<f64>, ValidationError> {
    let mut angles = Vec::new();
    for token in input.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        match token.parse::<f64>() {
            Ok(angle) if angle.is_finite() => angles.push(angle),
            _ => return Err(ValidationError::UnparsableAngle(token.to_string())),
        }
    }
    if angles.is_empty() {
        return Err(ValidationError::NoAngles);
    }
    Ok(angles)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::model::tests::response;
    use std::cell::{Cell, RefCell};

    /// Transport double that counts calls and replays a canned outcome
    pub(crate) struct FakeTransport {
        calls: Cell<usize>,
        reply: RefCell<ClientResult<TransportReply>>,
        last_request: RefCell<Option<SimulationParameters>>,
    }

    impl FakeTransport {
        fn replying(status: u16, body: &str) -> Self {
            Self {
                calls: Cell::new(0),
                reply: RefCell::new(Ok(TransportReply {
                    status,
                    body: body.as_bytes().to_vec(),
                })),
                last_request: RefCell::new(None),
            }
        }

        pub(crate) fn ok(response: &SimulationResponse) -> Self {
            Self::replying(200, &serde_json::to_string(response).unwrap())
        }

        fn unreachable() -> Self {
            let fake = Self::replying(0, "");
            *fake.reply.borrow_mut() = Err(SimulationError::Transport("connection refused".into()));
            fake
        }

        pub(crate) fn calls(&self) -> usize {
            self.calls.get()
        }
    }

    #[async_trait(?Send)]
    impl SimulationTransport for FakeTransport {
        async fn post_simulate(
            &self,
            request: &SimulationParameters,
        ) -> ClientResult<TransportReply> {
            self.calls.set(self.calls.get() + 1);
            *self.last_request.borrow_mut() = Some(request.clone());
            self.reply.borrow().clone()
        }
    }

    #[tokio::test]
    async fn test_results_preserve_request_order() {
        let canned = response(&[(30.0, 5), (45.0, 7), (60.0, 9)]);
        let client = SimulationClient::new(FakeTransport::ok(&canned));
        let params = SimulationParameters::new(20.0, 9.8, vec![30.0, 45.0, 60.0]);

        let got = client.simulate(&params, Mode::Compare).await.unwrap();
        let angles: Vec<f64> = got.results.iter().map(|r| r.angle).collect();
        assert_eq!(angles, params.angles);
        assert_eq!(client.transport().calls(), 1);
        assert_eq!(client.transport().last_request.borrow().as_ref(), Some(&params));
    }

    #[tokio::test]
    async fn test_validation_error_skips_remote_call() {
        let client = SimulationClient::new(FakeTransport::ok(&response(&[(30.0, 3)])));

        let empty = SimulationParameters::new(20.0, 9.8, vec![]);
        let err = client.simulate(&empty, Mode::Compare).await.unwrap_err();
        assert_eq!(err, SimulationError::Validation(ValidationError::NoAngles));

        let nan = SimulationParameters::new(20.0, 9.8, vec![f64::NAN]);
        let err = client.simulate(&nan, Mode::Throw).await.unwrap_err();
        assert_eq!(err, SimulationError::Validation(ValidationError::NonFiniteAngle));

        let two = SimulationParameters::new(20.0, 9.8, vec![30.0, 45.0]);
        let err = client.simulate(&two, Mode::Throw).await.unwrap_err();
        assert_eq!(err, SimulationError::Validation(ValidationError::TooManyAngles(2)));

        assert_eq!(client.transport().calls(), 0);
    }

    #[tokio::test]
    async fn test_server_error_message_is_decoded() {
        let client = SimulationClient::new(FakeTransport::replying(
            400,
            r#"{"error": "Velocity must be greater than 0."}"#,
        ));
        let params = SimulationParameters::new(0.0, 9.8, vec![45.0]);
        let err = client.simulate(&params, Mode::Compare).await.unwrap_err();
        assert_eq!(err, SimulationError::Server("Velocity must be greater than 0.".into()));
    }

    #[tokio::test]
    async fn test_server_error_without_body_is_generic() {
        let client = SimulationClient::new(FakeTransport::replying(502, "<html>Bad Gateway</html>"));
        let params = SimulationParameters::new(20.0, 9.8, vec![45.0]);
        let err = client.simulate(&params, Mode::Compare).await.unwrap_err();
        assert_eq!(err, SimulationError::Server(GENERIC_SERVER_ERROR.into()));
    }

    #[tokio::test]
    async fn test_transport_failure_is_not_retried() {
        let client = SimulationClient::new(FakeTransport::unreachable());
        let params = SimulationParameters::new(20.0, 9.8, vec![45.0]);
        let err = client.simulate(&params, Mode::Throw).await.unwrap_err();
        assert!(matches!(err, SimulationError::Transport(_)));
        assert_eq!(client.transport().calls(), 1);
    }

    #[test]
    fn test_decode_rejects_undecodable_success_body() {
        let reply = TransportReply {
            status: 200,
            body: b"not json".to_vec(),
        };
        assert!(matches!(decode_reply(&reply, 1), Err(SimulationError::Server(_))));
    }

    #[test]
    fn test_validate_parameter_ranges() {
        let mut params = SimulationParameters::new(20.0, 9.8, vec![45.0]);
        assert!(validate(&params, Mode::Throw).is_ok());

        params.gravity = 0.0;
        assert_eq!(validate(&params, Mode::Throw), Err(ValidationError::InvalidGravity));

        params.gravity = 9.8;
        params.velocity = -1.0;
        assert_eq!(validate(&params, Mode::Throw), Err(ValidationError::InvalidVelocity));

        params.velocity = 0.0;
        params.dt = 0.0;
        assert_eq!(validate(&params, Mode::Throw), Err(ValidationError::InvalidTimestep));
    }

    #[test]
    fn test_parse_angles() {
        assert_eq!(parse_angles("30, 45,60").unwrap(), vec![30.0, 45.0, 60.0]);
        assert_eq!(parse_angles(" 15 ,, ").unwrap(), vec![15.0]);
        assert_eq!(parse_angles("  "), Err(ValidationError::NoAngles));
        assert_eq!(
            parse_angles("30, abc"),
            Err(ValidationError::UnparsableAngle("abc".into()))
        );
        assert!(parse_angles("inf").is_err());
    }

    #[test]
    fn test_simulate_url_joins_base() {
        let transport = HttpTransport::new("http://localhost:5000/");
        assert_eq!(transport.simulate_url(), "http://localhost:5000/api/simulate");
    }
}
