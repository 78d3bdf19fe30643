//! Fixed-width payroll report rendering.
//!
//! The layout is column-exact: numeric values are right-aligned so that
//! their last character lands on a fixed column, and the payment method
//! starts at a fixed column. A value that does not fit is appended right
//! after the previous one without padding.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::PayrollResult;
use crate::models::{
    CommissionedPayment, HourlyPayment, PaidEmployee, PayrollRun, SalariedPayment,
};

const RULE: &str = "===============================================================================================================================";

const HOURLY_BANNER: &str = "===================== HORISTAS ================================================================================================";
const HOURLY_HEADER: &str =
    "Nome                                 Horas Extra Salario Bruto Descontos Salario Liquido Metodo";
const HOURLY_UNDERLINE: &str = "==================================== ===== ===== ============= ========= =============== ======================================";

const SALARIED_BANNER: &str = "===================== ASSALARIADOS ============================================================================================";
const SALARIED_HEADER: &str =
    "Nome                                             Salario Bruto Descontos Salario Liquido Metodo";
const SALARIED_UNDERLINE: &str = "================================================ ============= ========= =============== ======================================";

const COMMISSIONED_BANNER: &str = "===================== COMISSIONADOS ===========================================================================================";
const COMMISSIONED_HEADER: &str =
    "Nome                  Fixo     Vendas   Comissao Salario Bruto Descontos Salario Liquido Metodo";
const COMMISSIONED_UNDERLINE: &str = "===================== ======== ======== ======== ============= ========= =============== ======================================";

// Last column (0-based, inclusive) of each right-aligned field.
const HOURS_END: usize = 41;
const OVERTIME_END: usize = 47;
const FIXED_END: usize = 29;
const SALES_END: usize = 38;
const COMMISSION_END: usize = 47;
const GROSS_END: usize = 61;
const DEDUCTIONS_END: usize = 71;
const NET_END: usize = 87;
// First column of the payment method.
const METHOD_START: usize = 89;

/// Formats money with exactly two decimals and a comma separator.
///
/// # Example
///
/// ```
/// use payroll_engine::report::format_money;
/// use rust_decimal::Decimal;
///
/// assert_eq!(format_money(Decimal::new(54158, 2)), "541,58");
/// assert_eq!(format_money(Decimal::from(190)), "190,00");
/// assert_eq!(format_money(Decimal::ZERO), "0,00");
/// ```
pub fn format_money(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.2}", rounded).replace('.', ",")
}

/// Pads `line` so that `value` ends at column `end_inclusive`.
fn append_value(line: &mut String, value: &str, end_inclusive: usize) {
    let start = (end_inclusive + 1).saturating_sub(value.chars().count());
    pad_to(line, start);
    line.push_str(value);
}

/// Pads `line` so that `text` starts at column `start`.
fn append_text(line: &mut String, text: &str, start: usize) {
    pad_to(line, start);
    line.push_str(text);
}

fn pad_to(line: &mut String, column: usize) {
    let width = line.chars().count();
    if width < column {
        line.extend(std::iter::repeat_n(' ', column - width));
    }
}

fn append_pay(line: &mut String, gross: Decimal, deductions: Decimal, net: Decimal) {
    append_value(line, &format_money(gross), GROSS_END);
    append_value(line, &format_money(deductions), DEDUCTIONS_END);
    append_value(line, &format_money(net), NET_END);
}

fn append_method(line: &mut String, employee: &PaidEmployee) {
    append_text(line, &employee.payment_description, METHOD_START);
}

fn push_section_header(out: &mut String, banner: &str, header: &str, underline: &str) {
    for line in [RULE, banner, RULE, header, underline] {
        out.push_str(line);
        out.push('\n');
    }
}

fn push_totals(out: &mut String, totals: &str) {
    out.push('\n');
    out.push_str(totals);
    out.push_str("\n\n");
}

fn hourly_row(payment: &HourlyPayment) -> String {
    let mut line = payment.employee.name.clone();
    append_value(&mut line, &payment.displayed_normal_hours().to_string(), HOURS_END);
    append_value(&mut line, &payment.displayed_overtime_hours().to_string(), OVERTIME_END);
    append_pay(&mut line, payment.pay.gross, payment.pay.deductions, payment.pay.net);
    append_method(&mut line, &payment.employee);
    line
}

fn salaried_row(payment: &SalariedPayment) -> String {
    let mut line = payment.employee.name.clone();
    append_pay(&mut line, payment.pay.gross, payment.pay.deductions, payment.pay.net);
    append_method(&mut line, &payment.employee);
    line
}

fn commissioned_row(payment: &CommissionedPayment) -> String {
    let mut line = payment.employee.name.clone();
    append_value(&mut line, &format_money(payment.fixed), FIXED_END);
    append_value(&mut line, &format_money(payment.sales), SALES_END);
    append_value(&mut line, &format_money(payment.commission), COMMISSION_END);
    append_pay(&mut line, payment.pay.gross, payment.pay.deductions, payment.pay.net);
    append_method(&mut line, &payment.employee);
    line
}

fn render_hourly(out: &mut String, run: &PayrollRun) -> PayrollResult<()> {
    push_section_header(out, HOURLY_BANNER, HOURLY_HEADER, HOURLY_UNDERLINE);
    for payment in &run.hourly {
        out.push_str(&hourly_row(payment));
        out.push('\n');
    }

    let totals = run.hourly_totals()?;
    let mut line = String::from("TOTAL HORISTAS");
    append_value(&mut line, &totals.normal_hours.to_string(), HOURS_END);
    append_value(&mut line, &totals.overtime_hours.to_string(), OVERTIME_END);
    append_pay(&mut line, totals.pay.gross, totals.pay.deductions, totals.pay.net);
    push_totals(out, &line);
    Ok(())
}

fn render_salaried(out: &mut String, run: &PayrollRun) -> PayrollResult<()> {
    push_section_header(out, SALARIED_BANNER, SALARIED_HEADER, SALARIED_UNDERLINE);
    for payment in &run.salaried {
        out.push_str(&salaried_row(payment));
        out.push('\n');
    }

    let totals = run.salaried_totals()?;
    let mut line = String::from("TOTAL ASSALARIADOS");
    append_pay(&mut line, totals.gross, totals.deductions, totals.net);
    push_totals(out, &line);
    Ok(())
}

fn render_commissioned(out: &mut String, run: &PayrollRun) -> PayrollResult<()> {
    push_section_header(
        out,
        COMMISSIONED_BANNER,
        COMMISSIONED_HEADER,
        COMMISSIONED_UNDERLINE,
    );
    for payment in &run.commissioned {
        out.push_str(&commissioned_row(payment));
        out.push('\n');
    }

    let totals = run.commissioned_totals()?;
    let mut line = String::from("TOTAL COMISSIONADOS");
    append_value(&mut line, &format_money(totals.fixed), FIXED_END);
    append_value(&mut line, &format_money(totals.sales), SALES_END);
    append_value(&mut line, &format_money(totals.commission), COMMISSION_END);
    append_pay(&mut line, totals.pay.gross, totals.pay.deductions, totals.pay.net);
    push_totals(out, &line);
    Ok(())
}

/// Renders the full report for a payroll run.
///
/// Fails only if a section total leaves the decimal range.
pub fn render_report(run: &PayrollRun) -> PayrollResult<String> {
    let mut out = String::new();
    out.push_str("FOLHA DE PAGAMENTO DO DIA ");
    out.push_str(&run.pay_date.format("%Y-%m-%d").to_string());
    out.push('\n');
    out.push_str("====================================\n\n");

    render_hourly(&mut out, run)?;
    render_salaried(&mut out, run)?;
    render_commissioned(&mut out, run)?;

    out.push_str("TOTAL FOLHA: ");
    out.push_str(&format_money(run.total_gross()?));
    out.push('\n');
    Ok(out)
}
