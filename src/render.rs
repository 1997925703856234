// Plain-text rendering for the command line.
// Amounts are stored in MIST and shown in SUI with four decimals.

use crate::{
    fee::{self, FeeBreakdown},
    model::{Invoice, Payroll, TransactionRecord},
    store::DashboardStats,
    units,
};

/// Left-aligned table with a header rule
pub fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }

    let mut out = String::new();
    out.push_str(&pad_line(headers, &widths));
    out.push('\n');
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&rule.join("  "));
    out.push('\n');
    for row in rows {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        out.push_str(&pad_line(&cells, &widths));
        out.push('\n');
    }
    out
}

fn pad_line(cells: &[&str], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, w)| format!("{:<width$}", cell, width = *w))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

fn sui(mist: u64) -> String {
    units::format_smallest_as_display(mist, units::DEFAULT_DECIMALS)
}

pub fn invoice_table(invoices: &[Invoice]) -> String {
    if invoices.is_empty() {
        return "No invoices found\n".to_string();
    }
    let rows: Vec<Vec<String>> = invoices
        .iter()
        .map(|inv| {
            let fees = inv.fee_breakdown();
            vec![
                format!("#{}", inv.client_id),
                inv.id.clone(),
                inv.payer.clone(),
                inv.service.clone(),
                sui(fees.base),
                sui(fees.total),
                inv.status.to_string(),
                units::format_date(Some(inv.due_date)),
            ]
        })
        .collect();
    table(
        &["No.", "Id", "Payer", "Service", "Amount", "Total", "Status", "Due"],
        &rows,
    )
}

pub fn payroll_table(payrolls: &[Payroll]) -> String {
    if payrolls.is_empty() {
        return "No payrolls found\n".to_string();
    }
    let rows: Vec<Vec<String>> = payrolls
        .iter()
        .map(|p| {
            let fees = p.fee_breakdown();
            vec![
                p.id.clone(),
                p.project_name.clone(),
                p.client_email.clone(),
                p.recipients.len().to_string(),
                sui(fees.base),
                sui(fees.total),
                p.status.to_string(),
                units::format_date(Some(p.due_date)),
            ]
        })
        .collect();
    table(
        &["Id", "Project", "Client", "Team", "Amount", "Total", "Status", "Due"],
        &rows,
    )
}

pub fn transaction_table(txs: &[TransactionRecord]) -> String {
    if txs.is_empty() {
        return "No transactions found\n".to_string();
    }
    let rows: Vec<Vec<String>> = txs
        .iter()
        .map(|tx| vec![tx.id.clone(), sui(tx.amount), tx.date.clone(), tx.status.clone()])
        .collect();
    table(&["Id", "Amount", "Date", "Status"], &rows)
}

/// Amount, surcharge and total lines shared by detail views and quotes
pub fn fee_summary(fees: &FeeBreakdown) -> String {
    format!(
        "Amount:     {}\nSurcharge ({}): +{}\nTotal due:  {}\n",
        units::format_display_default(units::to_display_unit(fees.base)),
        units::format_bps_percent(fees.fee_rate_bps),
        units::format_display_default(fees.display_fee()),
        units::format_display_default(fees.display_total()),
    )
}

pub fn invoice_detail(inv: &Invoice) -> String {
    let mut out = format!(
        "Invoice #{} ({})\nPayee:      {}\nPayer:      {}\nService:    {}\nStatus:     {}\nDue:        {}\n",
        inv.client_id,
        inv.id,
        inv.payee_id,
        inv.payer,
        inv.service,
        inv.status,
        units::format_date(Some(inv.due_date)),
    );
    if let Some(description) = &inv.description {
        out.push_str(&format!("Notes:      {}\n", description));
    }
    out.push_str(&fee_summary(&inv.fee_breakdown()));
    if let Some(object_id) = &inv.object_id {
        out.push_str(&format!("Object:     {}\n", object_id));
    }
    if let Some(digest) = &inv.tx_digest {
        out.push_str(&format!("Paid in:    {}\n", digest));
    }
    out
}

pub fn payroll_detail(p: &Payroll) -> String {
    let mut out = format!(
        "Payroll {} ({})\nIssuer:     {}\nClient:     {}\nStatus:     {}\nDue:        {}\n",
        p.project_name,
        p.id,
        p.issuer,
        p.client_email,
        p.status,
        units::format_date(Some(p.due_date)),
    );
    if let Some(description) = &p.description {
        out.push_str(&format!("Notes:      {}\n", description));
    }
    out.push_str(&fee_summary(&p.fee_breakdown()));
    let rows: Vec<Vec<String>> = p
        .recipients
        .iter()
        .map(|r| vec![r.wallet.clone(), sui(r.amount)])
        .collect();
    out.push('\n');
    out.push_str(&table(&["Recipient", "Amount"], &rows));
    if let Some(tx) = p.payment_tx.as_ref().or(p.tx_digest.as_ref()) {
        out.push_str(&format!("Paid in:    {}\n", tx));
    }
    out
}

pub fn dashboard(stats: &DashboardStats) -> String {
    format!(
        "Invoices:   {}\nPaid:       {}\nPending:    {}\nVolume:     {}\n",
        stats.total_invoices,
        stats.paid_invoices,
        stats.pending_invoices,
        units::format_display_default(stats.total_amount),
    )
}

/// Quote for a display amount the user typed
pub fn quote(display_amount: f64, fee_rate_bps: u32) -> String {
    format!(
        "Amount:     {}\nSurcharge ({}): +{}\nTotal due:  {}\nIn MIST:    {}\n",
        units::format_display_default(display_amount),
        units::format_bps_percent(fee_rate_bps),
        units::format_display_default(fee::compute_fee(display_amount, fee_rate_bps)),
        units::format_display_default(fee::compute_total(display_amount, fee_rate_bps)),
        fee::compute_total_smallest(units::to_smallest_unit(display_amount), fee_rate_bps),
    )
}
