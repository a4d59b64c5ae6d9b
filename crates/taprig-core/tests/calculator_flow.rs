//! Calculator regression flow: ordered taps plus a rendered-text assertion,
//! driven entirely through the page-object layer.

mod common;

use std::time::Duration;

use taprig_core::locator::Locator;
use taprig_core::page::{Page, Screen};
use taprig_core::session::Session;
use taprig_core::wait::WaitSpec;

use common::{test_config, MockDriver};

/// Page object for the stock calculator app. Named locators plus thin
/// operations; everything goes through [`Page`].
struct CalculatorScreen {
    page: Page,
}

impl Screen for CalculatorScreen {
    fn page(&self) -> &Page {
        &self.page
    }
}

impl CalculatorScreen {
    const PKG: &'static str = "com.android.calculator2:id";

    fn new(page: Page) -> Self {
        Self { page }
    }

    fn key(name: &str) -> Locator {
        Locator::id(format!("{}/{name}", Self::PKG)).unwrap()
    }

    async fn tap_key(&self, name: &str) -> Result<(), taprig_core::driver::DriverError> {
        self.page.tap(&Self::key(name)).await
    }

    async fn result(&self) -> Result<String, taprig_core::driver::DriverError> {
        self.page.read_text(&Self::key("result")).await
    }
}

fn fast_wait() -> WaitSpec {
    WaitSpec::new(Duration::from_millis(500), Duration::from_millis(10)).unwrap()
}

#[tokio::test]
async fn addition_taps_in_order_and_reads_result() {
    common::init_tracing();
    let driver = MockDriver::new();
    for (name, id) in [
        ("digit_1", "el-1"),
        ("op_add", "el-plus"),
        ("digit_5", "el-5"),
        ("eq", "el-eq"),
        ("result", "el-result"),
    ] {
        driver.element(&CalculatorScreen::key(name), id);
    }
    driver.text("el-result", "6");

    let result = Session::run(driver.clone(), test_config(), |session| async move {
        let calc = CalculatorScreen::new(Page::with_wait(session, fast_wait()));

        calc.tap_key("digit_1").await?;
        calc.tap_key("op_add").await?;
        calc.tap_key("digit_5").await?;
        calc.tap_key("eq").await?;

        calc.result().await
    })
    .await
    .unwrap();

    assert_eq!(result, "6");
    assert_eq!(
        driver.taps(),
        vec!["el-1", "el-plus", "el-5", "el-eq"],
        "taps must reach the server in scenario order"
    );
    assert_eq!(driver.open_session_count(), 0);
}

#[tokio::test]
async fn result_rendering_is_awaited_not_assumed() {
    let driver = MockDriver::new();
    driver.element(&CalculatorScreen::key("eq"), "el-eq");
    // The result widget renders two polling rounds after the eq tap.
    driver.element_after(&CalculatorScreen::key("result"), "el-result", 3);
    driver.text("el-result", "4");

    let result = Session::run(driver.clone(), test_config(), |session| async move {
        let calc = CalculatorScreen::new(Page::with_wait(session, fast_wait()));
        calc.tap_key("eq").await?;
        calc.result().await
    })
    .await
    .unwrap();

    assert_eq!(result, "4");
}
