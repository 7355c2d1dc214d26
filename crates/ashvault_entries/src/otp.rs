//! One-time codes confirming renewals and deliveries.
//!
//! The code is shown to the operator, who reads it to the customer over the
//! phone; there is no DLT template for it.

use crate::error::EntryError;
use crate::service::EntryService;
use ashvault_common::models::{OtpType, OtpVerification};
use ashvault_common::Caller;
use ashvault_config::OtpConfig;
use ashvault_store::repositories::OtpRepository;
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

pub const OTP_LENGTH: usize = 6;

pub fn generate_code<R: Rng + ?Sized>(rng: &mut R) -> String {
    let upper = 10u32.pow(OTP_LENGTH as u32);
    format!("{:0width$}", rng.gen_range(0..upper), width = OTP_LENGTH)
}

#[derive(Clone)]
pub struct OtpService {
    repo: OtpRepository,
    config: OtpConfig,
}

impl OtpService {
    pub fn new(repo: OtpRepository, config: OtpConfig) -> Self {
        Self { repo, config }
    }

    pub async fn issue(
        &self,
        mobile: &str,
        otp_type: OtpType,
        entry_id: &str,
        now: DateTime<Utc>,
    ) -> Result<OtpVerification, EntryError> {
        let otp = OtpVerification {
            id: String::new(),
            mobile: mobile.to_string(),
            otp: generate_code(&mut rand::thread_rng()),
            otp_type,
            entry_id: entry_id.to_string(),
            expires_at: now + Duration::minutes(self.config.validity_minutes),
            is_verified: false,
            attempts: 0,
            created_at: now,
            verified_at: None,
            is_used: false,
            used_at: None,
        };
        let otp = self.repo.create(otp).await?;
        info!(otp_id = %otp.id, entry = %entry_id, ?otp_type, "OTP issued");
        Ok(otp)
    }

    /// Check `code` against the stored OTP.
    ///
    /// Wrong codes count against the attempt limit. Verifying an already
    /// verified OTP again succeeds.
    pub async fn verify(
        &self,
        otp_id: &str,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<OtpVerification, EntryError> {
        let mut otp = self
            .repo
            .get(otp_id)
            .await?
            .ok_or_else(|| EntryError::NotFound(format!("OTP {}", otp_id)))?;

        if otp.is_verified {
            return Ok(otp);
        }
        if otp.attempts >= self.config.max_attempts {
            return Err(EntryError::OtpAttemptsExceeded);
        }
        if now > otp.expires_at {
            return Err(EntryError::OtpExpired);
        }

        if otp.otp != code.trim() {
            otp.attempts += 1;
            self.repo
                .update(otp_id, json!({ "attempts": otp.attempts }))
                .await?;
            warn!(otp_id, attempts = otp.attempts, "OTP mismatch");
            return Err(EntryError::OtpMismatch);
        }

        otp.is_verified = true;
        otp.verified_at = Some(now);
        self.repo
            .update(
                otp_id,
                json!({ "isVerified": true, "verifiedAt": now.to_rfc3339() }),
            )
            .await?;
        info!(otp_id, "OTP verified");
        Ok(otp)
    }

    /// Use up a verified OTP of `otp_type` issued for `entry_id`.
    ///
    /// A code authorizes one workflow step and only until it expires.
    pub async fn consume_verified(
        &self,
        otp_id: &str,
        entry_id: &str,
        otp_type: OtpType,
        now: DateTime<Utc>,
    ) -> Result<(), EntryError> {
        let otp = self
            .repo
            .get(otp_id)
            .await?
            .ok_or_else(|| EntryError::NotFound(format!("OTP {}", otp_id)))?;
        if !otp.is_verified || otp.entry_id != entry_id || otp.otp_type != otp_type {
            return Err(EntryError::OtpNotVerified);
        }
        if otp.is_used {
            return Err(EntryError::OtpAlreadyUsed);
        }
        if now > otp.expires_at {
            return Err(EntryError::OtpExpired);
        }
        self.repo
            .update(otp_id, json!({ "isUsed": true, "usedAt": now.to_rfc3339() }))
            .await?;
        info!(otp_id, entry = entry_id, "OTP used");
        Ok(())
    }
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueOtpRequest {
    pub entry_id: String,
    #[serde(rename = "type")]
    pub otp_type: OtpType,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuedOtp {
    pub otp_id: String,
    pub otp: String,
    pub mobile: String,
    pub expires_at: DateTime<Utc>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpRequest {
    pub otp_id: String,
    pub otp: String,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifiedOtp {
    pub otp_id: String,
    pub verified: bool,
    pub entry_id: String,
}

impl EntryService {
    /// Issue a code for the customer of an entry the caller may act on.
    pub async fn issue_otp(
        &self,
        caller: &Caller,
        request: IssueOtpRequest,
    ) -> Result<IssuedOtp, EntryError> {
        let entry = self.entry_for(caller, &request.entry_id).await?;
        let otp = self
            .otp
            .issue(&entry.customer_mobile, request.otp_type, &entry.id, Utc::now())
            .await?;
        Ok(IssuedOtp {
            otp_id: otp.id,
            otp: otp.otp,
            mobile: otp.mobile,
            expires_at: otp.expires_at,
        })
    }

    pub async fn verify_otp(
        &self,
        caller: &Caller,
        request: VerifyOtpRequest,
    ) -> Result<VerifiedOtp, EntryError> {
        let pending = self
            .repos
            .otp
            .get(&request.otp_id)
            .await?
            .ok_or_else(|| EntryError::NotFound(format!("OTP {}", request.otp_id)))?;
        self.entry_for(caller, &pending.entry_id).await?;

        let otp = self.otp.verify(&request.otp_id, &request.otp, Utc::now()).await?;
        Ok(VerifiedOtp {
            otp_id: otp.id,
            verified: otp.is_verified,
            entry_id: otp.entry_id,
        })
    }
}
