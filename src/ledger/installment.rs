use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// An explicitly registered installment purchase with its full schedule
/// generated up front, one occurrence per month from the start date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallmentPurchase {
    pub description: String,
    pub total_amount: f64,
    pub num_installments: u32,
    pub installment_amount: f64,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub installments: Vec<ScheduledInstallment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledInstallment {
    pub number: u32,
    pub amount: f64,
    pub date: NaiveDate,
    #[serde(default)]
    pub paid: bool,
}

impl InstallmentPurchase {
    pub fn new(
        description: impl Into<String>,
        total_amount: f64,
        num_installments: u32,
        start_date: NaiveDate,
    ) -> Self {
        let num_installments = num_installments.max(1);
        let installment_amount = total_amount / num_installments as f64;
        let installments = (0..num_installments)
            .map(|i| ScheduledInstallment {
                number: i + 1,
                amount: installment_amount,
                date: start_date
                    .checked_add_months(Months::new(i))
                    .unwrap_or(start_date),
                paid: false,
            })
            .collect();
        Self {
            description: description.into(),
            total_amount,
            num_installments,
            installment_amount,
            start_date,
            installments,
        }
    }

    pub fn mark_paid(&mut self, number: u32) -> bool {
        match self.installments.iter_mut().find(|p| p.number == number) {
            Some(installment) => {
                installment.paid = true;
                true
            }
            None => false,
        }
    }
}
