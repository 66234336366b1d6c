//! # engine::generator
//!
//! **Strategy Document Generator** — renders [`StrategyParams`] into the block
//! XML that the DBot editor imports.
//!
//! ## Document layout
//! ```text
//! <xml is_dbot="true">
//!   ├─ <variables>            5 canonical declarations
//!   ├─ trade_definition
//!   │    ├─ TRADE_OPTIONS     market → tradetype → contracttype → candle → restart
//!   │    ├─ SUBMARKET         tradeoptions (DURATION ticks, AMOUNT stake)
//!   │    └─ INITIALIZATION    Initial Stake → Profit Threshold → Loss Threshold
//!   ├─ before_purchase        purchase CALL/PUT
//!   └─ after_purchase         if -loss < profit < +profit → trade_again
//! ```
//!
//! The tag and attribute set is the editor's format and must stay verbatim.
//! Rendering is a pure function: the variable table is a `static` slice, so no
//! state survives between calls.

use crate::models::{Numeric, StrategyParams};

/// Root namespace required by the editor.
pub const XML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// `read_details` index of the running profit/loss of the last contract.
const PROFIT_DETAIL_INDEX: u8 = 4;

/// Candle interval in seconds; fixed by the editor template.
const CANDLE_INTERVAL: u32 = 60;

// ─── Variable Declarations ────────────────────────────────────────────────────

/// One `<variable>` entry of the document header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariableDecl {
    pub id:       &'static str,
    pub name:     &'static str,
    pub var_type: &'static str,
    pub is_local: bool,
    pub is_cloud: bool,
}

impl VariableDecl {
    const fn plain(id: &'static str, name: &'static str) -> Self {
        Self { id, name, var_type: "", is_local: false, is_cloud: false }
    }
}

pub const INITIAL_STAKE_VAR:    VariableDecl = VariableDecl::plain("initial_stake_var", "Initial Stake");
pub const CURRENT_STAKE_VAR:    VariableDecl = VariableDecl::plain("current_stake_var", "Current Stake");
pub const PROFIT_THRESHOLD_VAR: VariableDecl = VariableDecl::plain("profit_threshold_var", "Profit Threshold");
pub const LOSS_THRESHOLD_VAR:   VariableDecl = VariableDecl::plain("loss_threshold_var", "Loss Threshold");
pub const TOTAL_PROFIT_VAR:     VariableDecl = VariableDecl::plain("total_profit_var", "Total Profit");

/// Canonical declaration order. Output order follows this slice exactly.
pub static VARIABLES: [VariableDecl; 5] = [
    INITIAL_STAKE_VAR,
    CURRENT_STAKE_VAR,
    PROFIT_THRESHOLD_VAR,
    LOSS_THRESHOLD_VAR,
    TOTAL_PROFIT_VAR,
];

// ─── Entry Point ──────────────────────────────────────────────────────────────

/// Render a complete strategy document.
pub fn generate(params: &StrategyParams) -> String {
    // เอกสารจริงยาวราว 7KB
    let mut xml = String::with_capacity(8 * 1024);

    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str(&format!(
        "<xml xmlns=\"{XML_NAMESPACE}\" is_dbot=\"true\" collection=\"false\">\n"
    ));
    xml.push_str(&variables_section(&VARIABLES));
    xml.push_str(&trade_definition(params));
    xml.push_str(&initialization(params));
    xml.push_str(&before_purchase(params));
    xml.push_str(&after_purchase(params));
    xml.push_str("</xml>");

    xml
}

// ─── Sections ─────────────────────────────────────────────────────────────────

fn variables_section(vars: &[VariableDecl]) -> String {
    let mut xml = String::from("  <variables>\n");
    for var in vars {
        xml.push_str(&format!(
            "    <variable type=\"{}\" id=\"{}\" islocal=\"{}\" iscloud=\"{}\">{}</variable>\n",
            escape(var.var_type),
            escape(var.id),
            var.is_local,
            var.is_cloud,
            escape(var.name),
        ));
    }
    xml.push_str("  </variables>\n");
    xml
}

/// Opens `trade_definition`; the block is closed by [`initialization`].
fn trade_definition(params: &StrategyParams) -> String {
    let market    = escape(&params.market);
    let submarket = escape(&params.submarket);
    let symbol    = escape(&params.symbol);
    let duration  = params.duration;
    let stake     = params.stake;

    format!(
        r#"
  <block type="trade_definition" id="trade_def_main" deletable="false" x="0" y="0">
    <statement name="TRADE_OPTIONS">
      <block type="trade_definition_market" id="market_def" deletable="false" movable="false">
        <field name="MARKET_LIST">{market}</field>
        <field name="SUBMARKET_LIST">{submarket}</field>
        <field name="SYMBOL_LIST">{symbol}</field>
        <next>
          <block type="trade_definition_tradetype" id="tradetype_def" deletable="false" movable="false">
            <field name="TRADETYPECAT_LIST">callput</field>
            <field name="TRADETYPE_LIST">callput</field>
            <next>
              <block type="trade_definition_contracttype" id="contracttype_def" deletable="false" movable="false">
                <field name="TYPE_LIST">both</field>
                <next>
                  <block type="trade_definition_candleinterval" id="candleinterval_def" deletable="false" movable="false">
                    <field name="CANDLEINTERVAL_LIST">{CANDLE_INTERVAL}</field>
                    <next>
                      <block type="trade_definition_restartbuysell" id="restart_def" deletable="false" movable="false">
                        <field name="TIME_MACHINE_ENABLED">FALSE</field>
                        <next>
                          <block type="trade_definition_restartonerror" id="error_def" deletable="false" movable="false">
                            <field name="RESTARTONERROR">TRUE</field>
                          </block>
                        </next>
                      </block>
                    </next>
                  </block>
                </next>
              </block>
            </next>
          </block>
        </next>
      </block>
    </statement>
    <statement name="SUBMARKET">
      <block type="trade_definition_tradeoptions" id="tradeoptions_def">
        <mutation has_first_barrier="false" has_second_barrier="false" has_prediction="false"></mutation>
        <field name="DURATIONTYPE_LIST">t</field>
        <value name="DURATION">
{duration_shadow}
        </value>
        <value name="AMOUNT">
{stake_shadow}
        </value>
      </block>
    </statement>
"#,
        duration_shadow = shadow_number(duration, 10),
        stake_shadow    = shadow_number(stake, 10),
    )
}

/// `INITIALIZATION` statement plus the closing tag of `trade_definition`.
fn initialization(params: &StrategyParams) -> String {
    format!(
        r#"
    <statement name="INITIALIZATION">
      <block type="variables_set" id="initial_stake_set">
        <field name="VAR" id="{initial_id}">{initial_name}</field>
        <value name="VALUE">
{initial_stake}
        </value>
        <next>
          <block type="variables_set" id="profit_threshold_set">
            <field name="VAR" id="{profit_id}">{profit_name}</field>
            <value name="VALUE">
{profit_threshold}
            </value>
            <next>
              <block type="variables_set" id="loss_threshold_set">
                <field name="VAR" id="{loss_id}">{loss_name}</field>
                <value name="VALUE">
{loss_threshold}
                </value>
              </block>
            </next>
          </block>
        </next>
      </block>
    </statement>
  </block>
"#,
        initial_id       = INITIAL_STAKE_VAR.id,
        initial_name     = INITIAL_STAKE_VAR.name,
        initial_stake    = shadow_number(params.initial_stake, 10),
        profit_id        = PROFIT_THRESHOLD_VAR.id,
        profit_name      = PROFIT_THRESHOLD_VAR.name,
        profit_threshold = shadow_number(params.profit_threshold, 14),
        loss_id          = LOSS_THRESHOLD_VAR.id,
        loss_name        = LOSS_THRESHOLD_VAR.name,
        loss_threshold   = shadow_number(params.loss_threshold, 18),
    )
}

fn before_purchase(params: &StrategyParams) -> String {
    format!(
        r#"
  <block type="before_purchase" id="before_purchase" deletable="false">
    <statement name="BEFOREPURCHASE_STACK">
      <block type="purchase" id="purchase">
        <field name="PURCHASE_LIST">{contract_type}</field>
      </block>
    </statement>
  </block>
"#,
        contract_type = params.contract_type.as_str(),
    )
}

/// Trade again while `-loss_threshold < profit < profit_threshold`.
fn after_purchase(params: &StrategyParams) -> String {
    // ติดลบด้วยตัวเลข ไม่ใช่ต่อ string "-" (กัน --50)
    let lower = params.loss_threshold.negate();
    let upper = params.profit_threshold;

    format!(
        r#"
  <block type="after_purchase" id="after_purchase">
    <statement name="AFTERPURCHASE_STACK">
      <block type="controls_if" id="trade_again_condition">
        <mutation else="1"></mutation>
        <value name="IF0">
          <block type="logic_operation">
            <field name="OP">AND</field>
            <value name="A">
{lower_check}
            </value>
            <value name="B">
{upper_check}
            </value>
          </block>
        </value>
        <statement name="DO0">
          <block type="trade_again" id="trade_again"></block>
        </statement>
      </block>
    </statement>
  </block>
"#,
        lower_check = compare_profit("GT", lower, 14),
        upper_check = compare_profit("LT", upper, 14),
    )
}

// ─── Fragments ────────────────────────────────────────────────────────────────

/// `<shadow type="math_number">` literal, indented by `pad` spaces.
fn shadow_number(value: Numeric, pad: usize) -> String {
    let indent = " ".repeat(pad);
    format!(
        "{indent}<shadow type=\"math_number\">\n\
         {indent}  <field name=\"NUM\">{value}</field>\n\
         {indent}</shadow>"
    )
}

/// `logic_compare` of the running profit (`read_details`) against `bound`.
fn compare_profit(op: &str, bound: Numeric, pad: usize) -> String {
    let i = " ".repeat(pad);
    format!(
        "{i}<block type=\"logic_compare\">\n\
         {i}  <field name=\"OP\">{op}</field>\n\
         {i}  <value name=\"A\">\n\
         {i}    <block type=\"read_details\">\n\
         {i}      <field name=\"DETAIL_INDEX\">{PROFIT_DETAIL_INDEX}</field>\n\
         {i}    </block>\n\
         {i}  </value>\n\
         {i}  <value name=\"B\">\n\
         {i}    <block type=\"math_number\">\n\
         {i}      <field name=\"NUM\">{bound}</field>\n\
         {i}    </block>\n\
         {i}  </value>\n\
         {i}</block>"
    )
}

/// Escape the five XML special characters for text and attribute content.
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

// ─── Tests ────────────────────────────────────────────────────────────────────
