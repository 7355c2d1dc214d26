// File: crates/ashvault_entries/src/doc.rs
#![cfg(feature = "openapi")]

use crate::bulk_import::{BulkImportReport, BulkImportRequest, BulkImportRow, RowError};
use crate::notify::Notification;
use crate::otp::{IssueOtpRequest, IssuedOtp, VerifiedOtp, VerifyOtpRequest};
use crate::views::{DashboardStats, LockerGrid, LockerOccupant, LockerSlot, LockerStatus};
use crate::workflows::{DispatchRequest, DisposeRequest, IntakeRequest, RenewRequest, WorkflowResult};
use ashvault_common::models::{
    Customer, DispatchRecord, Entry, EntryStatus, OtpType, Payment, PaymentType, Renewal,
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::list_customers_handler,
        crate::handlers::lookup_customer_handler,
        crate::handlers::get_customer_handler,
        crate::handlers::intake_handler,
        crate::handlers::list_entries_handler,
        crate::handlers::get_entry_handler,
        crate::handlers::renew_handler,
        crate::handlers::dispatch_handler,
        crate::handlers::dispose_handler,
        crate::handlers::bulk_import_handler,
        crate::handlers::locker_grid_handler,
        crate::handlers::dashboard_handler,
        crate::handlers::issue_otp_handler,
        crate::handlers::verify_otp_handler,
    ),
    components(
        schemas(
            Customer,
            Entry,
            EntryStatus,
            Payment,
            PaymentType,
            Renewal,
            DispatchRecord,
            OtpType,
            IntakeRequest,
            RenewRequest,
            DispatchRequest,
            DisposeRequest,
            WorkflowResult,
            Notification,
            BulkImportRequest,
            BulkImportRow,
            BulkImportReport,
            RowError,
            LockerGrid,
            LockerSlot,
            LockerOccupant,
            LockerStatus,
            DashboardStats,
            IssueOtpRequest,
            IssuedOtp,
            VerifyOtpRequest,
            VerifiedOtp,
        )
    ),
    tags(
        (name = "Customers", description = "Families who brought ashes"),
        (name = "Entries", description = "Stored ashes and their lifecycle"),
        (name = "OTP", description = "Customer confirmation codes")
    )
)]
pub struct EntriesApiDoc;
