//! Prompt-based payment sheet

use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};

use checkout_core::{
    AlternativeMethodToken, CardDetails, CheckoutError, CompletionOutcome, DialogFactory,
    PaymentDetails, PaymentDialog, Result, ShoppingCartDetails, SupportedPaymentMethodData,
    request::BASIC_CARD,
};

/// Payment sheet reading the shopper's answers line by line.
///
/// An empty card number or end of input cancels the sheet.
pub struct TerminalDialog<R> {
    methods: Vec<SupportedPaymentMethodData>,
    cart: ShoppingCartDetails,
    input: Lines<R>,
}

impl<R: AsyncBufRead + Unpin> TerminalDialog<R> {
    pub fn new(
        methods: Vec<SupportedPaymentMethodData>,
        cart: ShoppingCartDetails,
        input: R,
    ) -> Self {
        Self {
            methods,
            cart,
            input: input.lines(),
        }
    }

    async fn prompt(&mut self, label: &str) -> Result<String> {
        eprint!("{label}: ");
        match self.input.next_line().await {
            Ok(Some(line)) => Ok(line.trim().to_string()),
            Ok(None) => Err(CheckoutError::DialogRejected("input closed".into())),
            Err(e) => Err(CheckoutError::Dialog(e.to_string())),
        }
    }

    fn print_summary(&self) {
        eprintln!("\nOrder {}", self.cart.id);
        for item in &self.cart.display_items {
            eprintln!("  {:<12} {} {}", item.label, item.amount.currency, item.amount.value);
        }
        eprintln!(
            "  {:<12} {} {}\n",
            self.cart.total.label, self.cart.total.amount.currency, self.cart.total.amount.value
        );
    }

    /// Index into `methods` picked by the shopper
    async fn choose_method(&mut self) -> Result<usize> {
        if self.methods.len() == 1 {
            return Ok(0);
        }

        for (idx, method) in self.methods.iter().enumerate() {
            eprintln!("  [{}] {}", idx + 1, method.supported_methods);
        }
        let choice = self.prompt("Pay with").await?;
        if choice.is_empty() {
            return Err(CheckoutError::DialogRejected("no payment method chosen".into()));
        }

        choice
            .parse::<usize>()
            .ok()
            .filter(|n| (1..=self.methods.len()).contains(n))
            .map(|n| n - 1)
            .ok_or_else(|| CheckoutError::Dialog(format!("invalid choice '{choice}'")))
    }

    async fn read_card(&mut self) -> Result<CardDetails> {
        if let Some(data) = &self.methods[0].data {
            eprintln!("Accepted cards: {}", data.supported_networks.join(", "));
        }

        let card_number = self.prompt("Card number").await?;
        if card_number.is_empty() {
            return Err(CheckoutError::DialogRejected("payment cancelled".into()));
        }

        Ok(CardDetails {
            card_number,
            expiry_month: self.prompt("Expiry month").await?,
            expiry_year: self.prompt("Expiry year").await?,
            cardholder_name: self.prompt("Cardholder name").await?,
            card_security_code: self.prompt("Security code").await?,
        })
    }
}

#[async_trait(?Send)]
impl<R: AsyncBufRead + Unpin> PaymentDialog for TerminalDialog<R> {
    async fn show(&mut self) -> Result<PaymentDetails> {
        self.print_summary();

        let idx = self.choose_method().await?;
        if self.methods[idx].supported_methods == BASIC_CARD {
            return Ok(PaymentDetails::Card(self.read_card().await?));
        }

        let id = self.prompt("Payment token").await?;
        if id.is_empty() {
            return Err(CheckoutError::DialogRejected("payment cancelled".into()));
        }
        Ok(PaymentDetails::AlternativeMethod(AlternativeMethodToken { id }))
    }

    async fn complete(&mut self, outcome: CompletionOutcome) -> Result<()> {
        eprintln!("Payment sheet closed ({outcome})");
        Ok(())
    }
}

/// Opens [`TerminalDialog`]s on stdin
pub struct TerminalDialogs;

impl DialogFactory for TerminalDialogs {
    fn create(
        &self,
        methods: &[SupportedPaymentMethodData],
        cart: &ShoppingCartDetails,
    ) -> Result<Box<dyn PaymentDialog>> {
        let dialog: TerminalDialog<BufReader<Stdin>> =
            TerminalDialog::new(methods.to_vec(), cart.clone(), BufReader::new(tokio::io::stdin()));
        Ok(Box::new(dialog))
    }
}
