//! Customer rows decoded from an uploaded `.xlsx` workbook.
//!
//! The first worksheet's first row names the fields (`name`, `phoneNumber`,
//! `email`, `outstandingPayment`, `paymentDueDate`, `paymentStatus`); every
//! later non-blank row becomes one [`CustomerInput`]. Cells are coerced to
//! the type each field expects so numeric phone numbers and date-formatted
//! cells survive; anything that cannot be coerced is left out and reported
//! by customer validation.

use std::io::Cursor;

use calamine::{Data, Reader, Xlsx};

use crate::domain::CustomerInput;

/// Why a workbook could not be turned into rows.
#[derive(Debug, thiserror::Error)]
pub enum SpreadsheetError {
    #[error("workbook could not be read: {0}")]
    Unreadable(String),
    #[error("workbook has no worksheets")]
    NoWorksheet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Name,
    PhoneNumber,
    Email,
    OutstandingPayment,
    PaymentDueDate,
    PaymentStatus,
}

impl Column {
    fn from_header(cell: &Data) -> Option<Self> {
        let Data::String(raw) = cell else {
            return None;
        };
        match raw.trim() {
            "name" => Some(Self::Name),
            "phoneNumber" => Some(Self::PhoneNumber),
            "email" => Some(Self::Email),
            "outstandingPayment" => Some(Self::OutstandingPayment),
            "paymentDueDate" => Some(Self::PaymentDueDate),
            "paymentStatus" => Some(Self::PaymentStatus),
            _ => None,
        }
    }

    fn assign(self, row: &mut CustomerInput, cell: &Data) {
        match self {
            Self::Name => row.name = text(cell),
            Self::PhoneNumber => row.phone_number = text(cell),
            Self::Email => row.email = text(cell),
            Self::OutstandingPayment => row.outstanding_payment = number(cell),
            Self::PaymentDueDate => row.payment_due_date = date(cell),
            Self::PaymentStatus => row.payment_status = text(cell),
        }
    }
}

fn whole_number(value: f64) -> Option<i64> {
    // i64 covers every phone number; larger floats keep their decimal form.
    (value.fract() == 0.0 && value.abs() < 9.0e15).then_some(value as i64)
}

fn text(cell: &Data) -> Option<String> {
    match cell {
        Data::String(value) | Data::DateTimeIso(value) | Data::DurationIso(value) => {
            Some(value.clone())
        }
        Data::Int(value) => Some(value.to_string()),
        Data::Float(value) => Some(match whole_number(*value) {
            Some(whole) => whole.to_string(),
            None => value.to_string(),
        }),
        Data::Bool(value) => Some(value.to_string()),
        Data::DateTime(_) | Data::Error(_) | Data::Empty => None,
    }
}

fn number(cell: &Data) -> Option<f64> {
    match cell {
        Data::Float(value) => Some(*value),
        Data::Int(value) => Some(*value as f64),
        Data::String(value) => value.trim().parse().ok(),
        _ => None,
    }
}

fn date(cell: &Data) -> Option<String> {
    match cell {
        Data::DateTime(value) => value
            .as_datetime()
            .map(|at| at.date().format("%Y-%m-%d").to_string()),
        other => text(other),
    }
}

fn is_blank(row: &[Data]) -> bool {
    row.iter().all(|cell| match cell {
        Data::Empty => true,
        Data::String(value) => value.trim().is_empty(),
        _ => false,
    })
}

/// Decode the first worksheet of an `.xlsx` workbook into customer rows.
pub fn customer_rows(bytes: Vec<u8>) -> Result<Vec<CustomerInput>, SpreadsheetError> {
    let mut workbook = Xlsx::new(Cursor::new(bytes))
        .map_err(|err| SpreadsheetError::Unreadable(err.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(SpreadsheetError::NoWorksheet)?
        .map_err(|err| SpreadsheetError::Unreadable(err.to_string()))?;

    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Ok(Vec::new());
    };
    let columns: Vec<Option<Column>> = header.iter().map(Column::from_header).collect();

    Ok(rows
        .filter(|row| !is_blank(row))
        .map(|row| {
            let mut input = CustomerInput::default();
            for (column, cell) in columns.iter().zip(row) {
                if let Some(column) = column {
                    column.assign(&mut input, cell);
                }
            }
            input
        })
        .collect())
}
