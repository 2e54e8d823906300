//! Checkout Flow
//!
//! One checkout attempt moves through
//!
//! ```text
//! Idle ─▶ MethodsFetched ─▶ DialogShown ─▶ ResultReceived ─▶ Completed ─▶ Navigated
//! ```
//!
//! Every step suspends on an external operation and nothing runs in
//! parallel. The first failure aborts the attempt: it is logged, the shopper
//! gets a blocking notification and no navigation happens.

use std::rc::Rc;

use crate::dialog::{CompletionOutcome, DialogFactory, PaymentDetails, PaymentDialog};
use crate::error::{CheckoutError, Result};
use crate::gateway::{Gateway, InitiatePaymentRequest};
use crate::request::{build_shopping_cart_details, build_supported_payment_method_data};
use crate::routing::{Navigation, ResultTarget, route};

/// Full page redirect to a result page
pub trait Navigator {
    fn navigate(&self, target: ResultTarget) -> Result<()>;
}

/// Blocking, user facing error notification
pub trait Notifier {
    fn notify(&self, message: &str);
}

/// Where a session is in its lifecycle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CheckoutStage {
    Idle,
    MethodsFetched,
    DialogShown,
    ResultReceived,
    Completed(CompletionOutcome),
    Navigated,
    /// A step failed; the session cannot continue
    Aborted,
}

impl CheckoutStage {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::MethodsFetched => "methods-fetched",
            Self::DialogShown => "dialog-shown",
            Self::ResultReceived => "result-received",
            Self::Completed(_) => "completed",
            Self::Navigated => "navigated",
            Self::Aborted => "aborted",
        }
    }
}

impl std::fmt::Display for CheckoutStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Exclusive owner of one payment sheet.
///
/// Starts `Idle`, receives its sheet once the methods are fetched, shows it
/// once, completes it once, and only then may navigate. Calls out of order
/// fail with `InvalidState`.
pub struct CheckoutSession {
    dialog: Option<Box<dyn PaymentDialog>>,
    stage: CheckoutStage,
}

impl Default for CheckoutSession {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckoutSession {
    pub const fn new() -> Self {
        Self {
            dialog: None,
            stage: CheckoutStage::Idle,
        }
    }

    pub const fn stage(&self) -> CheckoutStage {
        self.stage
    }

    fn expect(&self, expected: CheckoutStage) -> Result<()> {
        if self.stage == expected {
            Ok(())
        } else {
            Err(CheckoutError::InvalidState {
                expected: expected.as_str(),
                actual: self.stage.as_str(),
            })
        }
    }

    fn missing_dialog(&self) -> CheckoutError {
        CheckoutError::InvalidState {
            expected: CheckoutStage::MethodsFetched.as_str(),
            actual: self.stage.as_str(),
        }
    }

    /// `Idle → MethodsFetched`: take ownership of the sheet built from the
    /// fetched methods
    pub fn open(&mut self, dialog: Box<dyn PaymentDialog>) -> Result<()> {
        self.expect(CheckoutStage::Idle)?;
        self.dialog = Some(dialog);
        self.stage = CheckoutStage::MethodsFetched;
        Ok(())
    }

    /// Show the sheet and wait for the shopper
    pub async fn show(&mut self) -> Result<PaymentDetails> {
        self.expect(CheckoutStage::MethodsFetched)?;
        let missing = self.missing_dialog();
        let dialog = self.dialog.as_mut().ok_or(missing)?;
        self.stage = CheckoutStage::DialogShown;

        match dialog.show().await {
            Ok(details) => {
                self.stage = CheckoutStage::ResultReceived;
                Ok(details)
            }
            Err(e) => {
                self.stage = CheckoutStage::Aborted;
                Err(e)
            }
        }
    }

    /// Close the sheet with `outcome`
    pub async fn complete(&mut self, outcome: CompletionOutcome) -> Result<()> {
        self.expect(CheckoutStage::ResultReceived)?;
        let missing = self.missing_dialog();
        let dialog = self.dialog.as_mut().ok_or(missing)?;

        if let Err(e) = dialog.complete(outcome).await {
            self.stage = CheckoutStage::Aborted;
            return Err(e);
        }

        self.stage = CheckoutStage::Completed(outcome);
        Ok(())
    }

    /// Leave the page. Only allowed once the sheet is completed.
    pub fn navigate(&mut self, navigator: &dyn Navigator, target: ResultTarget) -> Result<()> {
        let CheckoutStage::Completed(_) = self.stage else {
            return Err(CheckoutError::InvalidState {
                expected: "completed",
                actual: self.stage.as_str(),
            });
        };

        navigator.navigate(target)?;
        self.stage = CheckoutStage::Navigated;
        Ok(())
    }

    /// Mark the session dead after a failure between steps
    fn abort(&mut self) {
        self.stage = CheckoutStage::Aborted;
    }
}

/// Checkout orchestration.
///
/// Cheap to clone; collaborators are shared.
#[derive(Clone)]
pub struct CheckoutFlow {
    gateway: Rc<dyn Gateway>,
    dialogs: Rc<dyn DialogFactory>,
    navigator: Rc<dyn Navigator>,
    notifier: Rc<dyn Notifier>,
    alternative_method: Option<String>,
}

impl CheckoutFlow {
    pub fn new(
        gateway: Rc<dyn Gateway>,
        dialogs: Rc<dyn DialogFactory>,
        navigator: Rc<dyn Navigator>,
        notifier: Rc<dyn Notifier>,
    ) -> Self {
        Self {
            gateway,
            dialogs,
            navigator,
            notifier,
            alternative_method: None,
        }
    }

    /// Offer `identifier` as a second method next to cards
    #[must_use]
    pub fn with_alternative_method(mut self, identifier: Option<String>) -> Self {
        self.alternative_method = identifier;
        self
    }

    /// Run one lazy checkout attempt.
    ///
    /// Returns where the shopper was sent, or `None` if the attempt failed
    /// (already logged and notified).
    pub async fn checkout(&self) -> Option<Navigation> {
        match self.try_checkout().await {
            Ok(navigation) => Some(navigation),
            Err(e) => {
                self.report(&e);
                None
            }
        }
    }

    /// Lazy checkout without the top level error handler
    pub async fn try_checkout(&self) -> Result<Navigation> {
        self.try_prepare().await?.try_checkout().await
    }

    /// Fetch methods and build the sheet ahead of the checkout trigger.
    ///
    /// Failures are reported like any other checkout failure.
    pub async fn prepare(&self) -> Option<PreparedCheckout> {
        match self.try_prepare().await {
            Ok(prepared) => Some(prepared),
            Err(e) => {
                self.report(&e);
                None
            }
        }
    }

    /// `Idle → MethodsFetched`: fetch methods and create the sheet
    pub async fn try_prepare(&self) -> Result<PreparedCheckout> {
        let mut session = CheckoutSession::new();

        let methods = self.gateway.fetch_payment_methods().await?;
        tracing::debug!(
            count = methods.payment_methods.len(),
            "Fetched gateway payment methods"
        );

        let method_data =
            build_supported_payment_method_data(&methods, self.alternative_method.as_deref())?;
        let cart = build_shopping_cart_details();
        session.open(self.dialogs.create(&method_data, &cart)?)?;

        Ok(PreparedCheckout {
            flow: self.clone(),
            session,
        })
    }

    fn report(&self, error: &CheckoutError) {
        if error.is_cancellation() {
            tracing::warn!(error = %error, "Checkout cancelled");
        } else {
            tracing::error!(error = %error, "Checkout failed");
        }
        self.notifier.notify(&error.user_message());
    }
}

/// A sheet that has been built but not shown yet
pub struct PreparedCheckout {
    flow: CheckoutFlow,
    session: CheckoutSession,
}

impl PreparedCheckout {
    pub const fn stage(&self) -> CheckoutStage {
        self.session.stage()
    }

    /// Show the sheet and finish the attempt; errors are logged and notified
    pub async fn checkout(self) -> Option<Navigation> {
        let flow = self.flow.clone();
        match self.try_checkout().await {
            Ok(navigation) => Some(navigation),
            Err(e) => {
                flow.report(&e);
                None
            }
        }
    }

    /// `MethodsFetched → … → Navigated`
    pub async fn try_checkout(self) -> Result<Navigation> {
        let Self { flow, mut session } = self;

        let details = session.show().await?;

        let navigation = match details {
            PaymentDetails::AlternativeMethod(token) => {
                tracing::info!(token = %token.id, "Payment settled by alternative method");
                Navigation::settled()
            }
            PaymentDetails::Card(card) => {
                tracing::debug!(card = ?card, "Initiating card payment");
                let result = match flow
                    .gateway
                    .initiate_payment(&InitiatePaymentRequest::from(&card))
                    .await
                {
                    Ok(result) => result,
                    Err(e) => {
                        session.abort();
                        return Err(e);
                    }
                };

                tracing::info!(
                    result_code = %result.result_code,
                    psp_reference = ?result.psp_reference,
                    refusal_reason = ?result.refusal_reason,
                    "Gateway answered"
                );
                route(&result.result_code)
            }
        };

        session.complete(navigation.outcome).await?;
        session.navigate(flow.navigator.as_ref(), navigation.target)?;

        tracing::info!(
            outcome = %navigation.outcome,
            target = %navigation.target,
            "Checkout finished"
        );
        Ok(navigation)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use tracing_subscriber::{Layer, layer::Context, layer::SubscriberExt};

    use super::*;
    use crate::dialog::{AlternativeMethodToken, CardDetails};
    use crate::methods::PaymentMethodsResponse;
    use crate::request::{ShoppingCartDetails, SupportedPaymentMethodData};
    use crate::routing::{GatewayResult, ResultCode};

    /// Everything the fakes saw, in order
    #[derive(Default)]
    struct Journal {
        events: RefCell<Vec<String>>,
        initiated: RefCell<Vec<InitiatePaymentRequest>>,
        method_data: RefCell<Vec<SupportedPaymentMethodData>>,
        navigations: RefCell<Vec<ResultTarget>>,
        notifications: RefCell<Vec<String>>,
    }

    impl Journal {
        fn log(&self, event: impl Into<String>) {
            self.events.borrow_mut().push(event.into());
        }

        fn events(&self) -> Vec<String> {
            self.events.borrow().clone()
        }
    }

    /// Levels of the tracing events emitted while installed
    #[derive(Clone, Default)]
    struct LogLevels(Arc<Mutex<Vec<tracing::Level>>>);

    impl<S: tracing::Subscriber> Layer<S> for LogLevels {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            self.0.lock().unwrap().push(*event.metadata().level());
        }
    }

    impl LogLevels {
        fn install(&self) -> tracing::subscriber::DefaultGuard {
            tracing::subscriber::set_default(tracing_subscriber::registry().with(self.clone()))
        }

        fn contains(&self, level: tracing::Level) -> bool {
            self.0.lock().unwrap().contains(&level)
        }
    }

    struct FakeGateway {
        journal: Rc<Journal>,
        methods: serde_json::Value,
        result: std::result::Result<&'static str, &'static str>,
    }

    #[async_trait(?Send)]
    impl Gateway for FakeGateway {
        async fn fetch_payment_methods(&self) -> Result<PaymentMethodsResponse> {
            self.journal.log("fetch");
            Ok(serde_json::from_value(self.methods.clone())?)
        }

        async fn initiate_payment(&self, request: &InitiatePaymentRequest) -> Result<GatewayResult> {
            self.journal.log("initiate");
            self.journal.initiated.borrow_mut().push(request.clone());
            match self.result {
                Ok(code) => Ok(GatewayResult {
                    result_code: ResultCode::from(code),
                    ..Default::default()
                }),
                Err(e) => Err(CheckoutError::Network(e.into())),
            }
        }
    }

    struct FakeDialog {
        journal: Rc<Journal>,
        answers: VecDeque<Result<PaymentDetails>>,
    }

    #[async_trait(?Send)]
    impl PaymentDialog for FakeDialog {
        async fn show(&mut self) -> Result<PaymentDetails> {
            self.journal.log("show");
            self.answers
                .pop_front()
                .unwrap_or_else(|| Err(CheckoutError::Dialog("already shown".into())))
        }

        async fn complete(&mut self, outcome: CompletionOutcome) -> Result<()> {
            self.journal.log(format!("complete:{outcome}"));
            Ok(())
        }
    }

    struct FakeDialogs {
        journal: Rc<Journal>,
        answer: RefCell<Option<Result<PaymentDetails>>>,
    }

    impl DialogFactory for FakeDialogs {
        fn create(
            &self,
            methods: &[SupportedPaymentMethodData],
            _cart: &ShoppingCartDetails,
        ) -> Result<Box<dyn PaymentDialog>> {
            self.journal.log("create");
            self.journal.method_data.borrow_mut().extend_from_slice(methods);
            let answers = self.answer.borrow_mut().take().into_iter().collect();
            Ok(Box::new(FakeDialog {
                journal: self.journal.clone(),
                answers,
            }))
        }
    }

    struct FakeNavigator(Rc<Journal>);

    impl Navigator for FakeNavigator {
        fn navigate(&self, target: ResultTarget) -> Result<()> {
            self.0.log(format!("navigate:{target}"));
            self.0.navigations.borrow_mut().push(target);
            Ok(())
        }
    }

    struct FakeNotifier(Rc<Journal>);

    impl Notifier for FakeNotifier {
        fn notify(&self, message: &str) {
            self.0.notifications.borrow_mut().push(message.to_string());
        }
    }

    fn card() -> PaymentDetails {
        PaymentDetails::Card(CardDetails {
            card_number: "4111111111111111".into(),
            expiry_month: "03".into(),
            expiry_year: "2030".into(),
            cardholder_name: "J. Smith".into(),
            card_security_code: "737".into(),
        })
    }

    fn scheme_methods() -> serde_json::Value {
        serde_json::json!({
            "paymentMethods": [{ "type": "scheme", "brands": ["visa", "mc"] }]
        })
    }

    struct Harness {
        journal: Rc<Journal>,
        flow: CheckoutFlow,
    }

    fn harness(
        methods: serde_json::Value,
        dialog_answer: Result<PaymentDetails>,
        gateway_result: std::result::Result<&'static str, &'static str>,
    ) -> Harness {
        let journal = Rc::new(Journal::default());
        let flow = CheckoutFlow::new(
            Rc::new(FakeGateway {
                journal: journal.clone(),
                methods,
                result: gateway_result,
            }),
            Rc::new(FakeDialogs {
                journal: journal.clone(),
                answer: RefCell::new(Some(dialog_answer)),
            }),
            Rc::new(FakeNavigator(journal.clone())),
            Rc::new(FakeNotifier(journal.clone())),
        );
        Harness { journal, flow }
    }

    #[tokio::test]
    async fn test_authorised_card_payment() {
        let h = harness(scheme_methods(), Ok(card()), Ok("Authorised"));

        let navigation = h.flow.checkout().await.unwrap();
        assert_eq!(navigation.outcome, CompletionOutcome::Success);
        assert_eq!(navigation.target, ResultTarget::Success);

        assert_eq!(
            h.journal.events(),
            vec![
                "fetch",
                "create",
                "show",
                "initiate",
                "complete:success",
                "navigate:/result/success"
            ]
        );

        let initiated = h.journal.initiated.borrow();
        assert_eq!(initiated[0].payment_method.kind, "scheme");
        assert_eq!(initiated[0].payment_method.holder_name, "J. Smith");
        assert!(h.journal.notifications.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_result_codes_drive_completion_and_target() {
        let cases = [
            ("Pending", "complete:unknown", ResultTarget::Pending),
            ("Received", "complete:unknown", ResultTarget::Pending),
            ("Refused", "complete:fail", ResultTarget::Failed),
            ("Error", "complete:fail", ResultTarget::Error),
        ];

        for (code, completion, target) in cases {
            let h = harness(scheme_methods(), Ok(card()), Ok(code));
            let navigation = h.flow.checkout().await.unwrap();

            assert_eq!(navigation.target, target, "target for {code}");
            let events = h.journal.events();
            assert_eq!(events[4], completion, "completion for {code}");
            assert_eq!(*h.journal.navigations.borrow(), vec![target]);
        }
    }

    #[tokio::test]
    async fn test_cancelled_dialog_stops_the_flow_and_is_logged() {
        let logs = LogLevels::default();
        let _guard = logs.install();
        let h = harness(
            scheme_methods(),
            Err(CheckoutError::DialogRejected("User closed the sheet".into())),
            Ok("Authorised"),
        );

        assert!(h.flow.checkout().await.is_none());

        assert_eq!(h.journal.events(), vec!["fetch", "create", "show"]);
        assert!(h.journal.initiated.borrow().is_empty());
        assert!(h.journal.navigations.borrow().is_empty());
        assert_eq!(
            *h.journal.notifications.borrow(),
            vec!["Error occurred: Payment dialog was dismissed: User closed the sheet"]
        );
        assert!(logs.contains(tracing::Level::WARN));
    }

    #[tokio::test]
    async fn test_missing_scheme_fails_before_dialog() {
        let h = harness(
            serde_json::json!({ "paymentMethods": [{ "type": "paypal" }] }),
            Ok(card()),
            Ok("Authorised"),
        );

        let err = h.flow.try_checkout().await.err().unwrap();
        assert!(matches!(err, CheckoutError::MissingSchemeMethod));
        assert_eq!(h.journal.events(), vec!["fetch"]);
    }

    #[tokio::test]
    async fn test_initiation_failure_is_logged_and_notified_without_navigation() {
        let logs = LogLevels::default();
        let _guard = logs.install();
        let h = harness(scheme_methods(), Ok(card()), Err("connection reset"));

        assert!(h.flow.checkout().await.is_none());
        assert!(h.journal.navigations.borrow().is_empty());
        assert!(!h.journal.events().iter().any(|e| e.starts_with("complete")));
        assert_eq!(h.journal.notifications.borrow().len(), 1);
        assert!(logs.contains(tracing::Level::ERROR));
    }

    #[tokio::test]
    async fn test_alternative_method_skips_initiation() {
        let h = harness(
            scheme_methods(),
            Ok(PaymentDetails::AlternativeMethod(AlternativeMethodToken {
                id: "tok_42".into(),
            })),
            Ok("Refused"),
        );
        let flow = h.flow.clone().with_alternative_method(Some("https://bobpay.xyz/pay".into()));

        let navigation = flow.checkout().await.unwrap();
        assert_eq!(navigation, Navigation::settled());
        assert!(h.journal.initiated.borrow().is_empty());
        assert_eq!(
            h.journal.events(),
            vec!["fetch", "create", "show", "complete:success", "navigate:/result/success"]
        );

        let method_data = h.journal.method_data.borrow();
        assert_eq!(method_data.len(), 2);
        assert_eq!(method_data[1].supported_methods, "https://bobpay.xyz/pay");
    }

    #[tokio::test]
    async fn test_eager_prepare_then_checkout() {
        let h = harness(scheme_methods(), Ok(card()), Ok("Received"));

        let prepared = h.flow.prepare().await.unwrap();
        assert_eq!(prepared.stage(), CheckoutStage::MethodsFetched);
        assert_eq!(h.journal.events(), vec!["fetch", "create"]);

        let navigation = prepared.checkout().await.unwrap();
        assert_eq!(navigation.target, ResultTarget::Pending);
        assert_eq!(h.journal.events().len(), 6);
    }

    fn opened(dialog: FakeDialog) -> CheckoutSession {
        let mut session = CheckoutSession::new();
        session.open(Box::new(dialog)).unwrap();
        session
    }

    #[tokio::test]
    async fn test_idle_session_needs_a_sheet() {
        let journal = Rc::new(Journal::default());
        let mut session = CheckoutSession::new();
        assert_eq!(session.stage(), CheckoutStage::Idle);

        assert!(matches!(
            session.show().await,
            Err(CheckoutError::InvalidState { actual: "idle", .. })
        ));
        assert_eq!(session.stage(), CheckoutStage::Idle);

        let dialog = || FakeDialog {
            journal: journal.clone(),
            answers: VecDeque::new(),
        };
        session.open(Box::new(dialog())).unwrap();
        assert_eq!(session.stage(), CheckoutStage::MethodsFetched);
        assert!(matches!(
            session.open(Box::new(dialog())),
            Err(CheckoutError::InvalidState { expected: "idle", .. })
        ));
    }

    #[tokio::test]
    async fn test_session_enforces_order() {
        let journal = Rc::new(Journal::default());
        let mut session = opened(FakeDialog {
            journal: journal.clone(),
            answers: VecDeque::from([Ok(card())]),
        });
        let navigator = FakeNavigator(journal.clone());

        assert!(matches!(
            session.complete(CompletionOutcome::Success).await,
            Err(CheckoutError::InvalidState { .. })
        ));
        assert!(matches!(
            session.navigate(&navigator, ResultTarget::Success),
            Err(CheckoutError::InvalidState { .. })
        ));

        session.show().await.unwrap();
        assert_eq!(session.stage(), CheckoutStage::ResultReceived);
        assert!(matches!(
            session.show().await,
            Err(CheckoutError::InvalidState { .. })
        ));

        session.complete(CompletionOutcome::Fail).await.unwrap();
        assert_eq!(session.stage(), CheckoutStage::Completed(CompletionOutcome::Fail));
        assert!(matches!(
            session.complete(CompletionOutcome::Fail).await,
            Err(CheckoutError::InvalidState { .. })
        ));

        session.navigate(&navigator, ResultTarget::Failed).unwrap();
        assert_eq!(session.stage(), CheckoutStage::Navigated);
        assert_eq!(*journal.navigations.borrow(), vec![ResultTarget::Failed]);
    }

    #[tokio::test]
    async fn test_rejected_show_aborts_session() {
        let journal = Rc::new(Journal::default());
        let mut session = opened(FakeDialog {
            journal,
            answers: VecDeque::from([Err(CheckoutError::DialogRejected("AbortError".into()))]),
        });

        assert!(session.show().await.is_err());
        assert_eq!(session.stage(), CheckoutStage::Aborted);
    }
}
