// src/models/onboarding.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::{
    address::AddressPayload,
    finance::{BankAccount, BankAccountPayload, PaymentMethod, PaymentMethodPayload},
    garage::{Branch, Garage},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OnboardingStep {
    GarageProfile,
    MainBranch,
    PaymentMethods,
    BankAccount,
    Done,
}

impl OnboardingStep {
    pub const ORDER: [OnboardingStep; 4] = [
        OnboardingStep::GarageProfile,
        OnboardingStep::MainBranch,
        OnboardingStep::PaymentMethods,
        OnboardingStep::BankAccount,
    ];
}

/// O que já existe para a oficina do usuário.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OnboardingProgress {
    pub has_garage: bool,
    pub has_main_branch: bool,
    pub has_payment_methods: bool,
    pub has_bank_account: bool,
}

impl OnboardingProgress {
    pub fn is_done(&self, step: OnboardingStep) -> bool {
        match step {
            OnboardingStep::GarageProfile => self.has_garage,
            OnboardingStep::MainBranch => self.has_main_branch,
            OnboardingStep::PaymentMethods => self.has_payment_methods,
            OnboardingStep::BankAccount => self.has_bank_account,
            OnboardingStep::Done => self.completed_steps().len() == OnboardingStep::ORDER.len(),
        }
    }

    pub fn completed_steps(&self) -> Vec<OnboardingStep> {
        OnboardingStep::ORDER
            .into_iter()
            .filter(|step| self.is_done(*step))
            .collect()
    }

    /// Primeira etapa pendente, na ordem do assistente.
    pub fn next_step(&self) -> OnboardingStep {
        OnboardingStep::ORDER
            .into_iter()
            .find(|step| !self.is_done(*step))
            .unwrap_or(OnboardingStep::Done)
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GarageProfilePayload {
    #[validate(length(min = 1, max = 150, message = "required"))]
    #[schema(example = "Patil Auto Works")]
    pub name: String,

    #[validate(length(max = 200, message = "too_long"))]
    pub legal_name: Option<String>,

    #[validate(length(equal = 15, message = "invalid_gst_number"))]
    pub gst_number: Option<String>,

    #[validate(email(message = "invalid_email"))]
    pub email: Option<String>,

    #[validate(length(min = 6, max = 20, message = "invalid_phone"))]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MainBranchPayload {
    #[validate(length(min = 1, max = 150, message = "required"))]
    pub name: String,

    #[validate(length(min = 2, max = 30, message = "invalid_branch_code"))]
    pub branch_code: String,

    #[validate(length(max = 20, message = "too_long"))]
    pub phone: Option<String>,

    #[validate(email(message = "invalid_email"))]
    pub email: Option<String>,

    #[validate(nested)]
    pub address: AddressPayload,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompleteOnboardingPayload {
    #[validate(nested)]
    pub garage: GarageProfilePayload,

    #[validate(nested)]
    pub main_branch: MainBranchPayload,

    /// Vazio = apenas "Cash"
    #[serde(default)]
    #[validate(nested)]
    pub payment_methods: Vec<PaymentMethodPayload>,

    #[validate(nested)]
    pub bank_account: Option<BankAccountPayload>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingResult {
    pub garage: Garage,
    pub main_branch: Branch,
    pub payment_methods: Vec<PaymentMethod>,
    pub bank_account: Option<BankAccount>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingStatus {
    pub completed: bool,
    pub garage_id: Option<Uuid>,
    pub completed_steps: Vec<OnboardingStep>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NextStep {
    pub next_step: OnboardingStep,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn fresh_user_starts_at_garage_profile() {
        let progress = OnboardingProgress::default();

        assert_eq!(progress.next_step(), OnboardingStep::GarageProfile);
        assert!(progress.completed_steps().is_empty());
    }

    #[test]
    fn steps_are_taken_in_order() {
        let progress = OnboardingProgress {
            has_garage: true,
            has_main_branch: false,
            has_payment_methods: true,
            has_bank_account: false,
        };

        assert_eq!(progress.next_step(), OnboardingStep::MainBranch);
        assert_eq!(
            progress.completed_steps(),
            vec![OnboardingStep::GarageProfile, OnboardingStep::PaymentMethods]
        );
    }

    #[test]
    fn everything_present_is_done() {
        let progress = OnboardingProgress {
            has_garage: true,
            has_main_branch: true,
            has_payment_methods: true,
            has_bank_account: true,
        };

        assert_eq!(progress.next_step(), OnboardingStep::Done);
        assert!(progress.is_done(OnboardingStep::Done));
    }

    #[test]
    fn missing_garage_name_fails_validation_before_any_write() {
        let payload: CompleteOnboardingPayload = serde_json::from_value(json!({
            "garage": { "name": "" },
            "mainBranch": {
                "name": "Main",
                "branchCode": "PUN-01",
                "address": {
                    "line1": "Plot 12",
                    "city": "Pune",
                    "state": "MH",
                    "postalCode": "411001"
                }
            }
        }))
        .unwrap();

        let errors = payload.validate().unwrap_err();

        assert!(errors.errors().contains_key("garage"));
        assert!(payload.payment_methods.is_empty());
    }
}
