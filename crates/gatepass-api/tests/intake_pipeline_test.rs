//! End-to-end tests for the visitor intake pipeline over in-memory stores.
//!
//! The pipeline is exercised through the same store traits the Postgres
//! repositories implement, so these tests cover the full validation order,
//! state transitions, and failure surfaces without a database.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{Duration, Utc};
use uuid::Uuid;

use gatepass_api::services::intake::{
    GateDecision, IntakeContext, PhotoPolicy, PhotoUpload, QrGate, SubmissionGuard, UnitResolver,
    VisitorSubmission,
};
use gatepass_core::config::UnitLookupStrategy;
use gatepass_core::models::{
    NewVisitorRequest, Purpose, RequestSource, RequestStatus, Society, SocietyStatus, Unit,
    VisitorRequest,
};
use gatepass_core::stores::{ResidentStore, SocietyStore, UnitStore, VisitorRequestStore};
use gatepass_core::AppError;
use gatepass_storage::{Storage, StorageError, StorageResult};

// ---- In-memory fakes ----

struct FakeSocietyStore {
    society: Option<Society>,
    fail: bool,
}

#[async_trait]
impl SocietyStore for FakeSocietyStore {
    async fn get(&self, society_id: Uuid) -> Result<Option<Society>, AppError> {
        if self.fail {
            return Err(AppError::Internal("society store unavailable".to_string()));
        }
        Ok(self
            .society
            .clone()
            .filter(|society| society.id == society_id))
    }
}

#[derive(Default)]
struct FakeUnitStore {
    units: Vec<Unit>,
    lookups: AtomicUsize,
}

#[async_trait]
impl UnitStore for FakeUnitStore {
    async fn get_keyed(&self, society_id: Uuid, unit_no: &str) -> Result<Option<Unit>, AppError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .units
            .iter()
            .find(|u| u.society_id == society_id && u.unit_no == unit_no)
            .cloned())
    }

    async fn find_by_unit_no(
        &self,
        society_id: Uuid,
        unit_no: &str,
    ) -> Result<Option<Unit>, AppError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .units
            .iter()
            .find(|u| {
                u.society_id == society_id && u.unit_no.eq_ignore_ascii_case(unit_no)
            })
            .cloned())
    }
}

#[derive(Default)]
struct FakeResidentStore {
    names: HashMap<Uuid, String>,
    fail: bool,
}

#[async_trait]
impl ResidentStore for FakeResidentStore {
    async fn display_name(&self, resident_uid: Uuid) -> Result<Option<String>, AppError> {
        if self.fail {
            return Err(AppError::Internal("resident store unavailable".to_string()));
        }
        Ok(self.names.get(&resident_uid).cloned())
    }
}

#[derive(Default)]
struct FakeRequestStore {
    created: Mutex<Vec<VisitorRequest>>,
    fail_create: bool,
}

impl FakeRequestStore {
    fn created(&self) -> Vec<VisitorRequest> {
        self.created.lock().unwrap().clone()
    }
}

#[async_trait]
impl VisitorRequestStore for FakeRequestStore {
    async fn pending_exists(
        &self,
        society_id: Uuid,
        phone: &str,
        unit_no: &str,
    ) -> Result<bool, AppError> {
        Ok(self.created.lock().unwrap().iter().any(|r| {
            r.society_id == society_id
                && r.phone == phone
                && r.unit_no == unit_no
                && r.status == RequestStatus::Pending
        }))
    }

    async fn create(&self, request: NewVisitorRequest) -> Result<VisitorRequest, AppError> {
        if self.fail_create {
            return Err(AppError::Internal("insert failed".to_string()));
        }
        let created = VisitorRequest {
            id: Uuid::new_v4(),
            society_id: request.society_id,
            name: request.name,
            phone: request.phone,
            unit_no: request.unit_no,
            purpose: request.purpose,
            vehicle_number: request.vehicle_number,
            photo_key: request.photo_key,
            photo_url: request.photo_url,
            resident_uid: request.resident_uid,
            status: RequestStatus::Pending,
            source: RequestSource::Qr,
            created_at: Utc::now(),
            entry_time: None,
            exit_time: None,
        };
        self.created.lock().unwrap().push(created.clone());
        Ok(created)
    }
}

#[derive(Default)]
struct MemStorage {
    objects: Mutex<HashMap<String, Vec<u8>>>,
    deleted: Mutex<Vec<String>>,
    fail_upload: bool,
    fail_delete: bool,
}

impl MemStorage {
    fn object_count(&self) -> usize {
        self.objects.lock().unwrap().len()
    }
}

#[async_trait]
impl Storage for MemStorage {
    async fn upload(&self, key: &str, _content_type: &str, data: Vec<u8>) -> StorageResult<String> {
        if self.fail_upload {
            return Err(StorageError::UploadFailed("bucket offline".to_string()));
        }
        self.objects.lock().unwrap().insert(key.to_string(), data);
        Ok(format!("http://storage.test/{}", key))
    }

    async fn download(&self, key: &str) -> StorageResult<Vec<u8>> {
        self.objects
            .lock()
            .unwrap()
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        if self.fail_delete {
            return Err(StorageError::DeleteFailed("bucket offline".to_string()));
        }
        self.deleted.lock().unwrap().push(key.to_string());
        self.objects
            .lock()
            .unwrap()
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }
}

// ---- Fixtures ----

const SOCIETY_ID: Uuid = Uuid::from_u128(0x1111_2222_3333_4444_5555_6666_7777_8888);

fn society(status: SocietyStatus, qr_key: &str, expires_in_minutes: i64) -> Society {
    Society {
        id: SOCIETY_ID,
        name: "Green Meadows".to_string(),
        status,
        qr_key: qr_key.to_string(),
        qr_expiry: Some(Utc::now() + Duration::minutes(expires_in_minutes)),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn unit(unit_no: &str, resident_uid: Option<Uuid>) -> Unit {
    Unit {
        society_id: SOCIETY_ID,
        unit_no: unit_no.to_string(),
        block: unit_no.split('-').next().map(str::to_string),
        resident_uid,
        occupancy: "owner".to_string(),
        created_at: Utc::now(),
    }
}

fn photo() -> PhotoUpload {
    PhotoUpload {
        filename: "visitor.jpg".to_string(),
        content_type: "image/jpeg".to_string(),
        data: Bytes::from_static(b"jpeg-bytes"),
    }
}

fn submission(phone: &str, unit_no: &str) -> VisitorSubmission {
    VisitorSubmission {
        name: " Asha Rao ".to_string(),
        phone: phone.to_string(),
        unit_no: unit_no.to_string(),
        purpose: "Guest".to_string(),
        vehicle_number: String::new(),
    }
}

fn photo_policy() -> PhotoPolicy {
    PhotoPolicy {
        max_size_bytes: 1024 * 1024,
        allowed_extensions: vec!["jpg".into(), "jpeg".into(), "png".into()],
        allowed_content_types: vec!["image/jpeg".into(), "image/png".into()],
    }
}

struct Harness {
    gate: QrGate,
    guard: SubmissionGuard,
    units: Arc<FakeUnitStore>,
    requests: Arc<FakeRequestStore>,
    storage: Arc<MemStorage>,
}

fn harness_with(
    society_store: FakeSocietyStore,
    unit_store: FakeUnitStore,
    resident_store: FakeResidentStore,
    request_store: FakeRequestStore,
    storage: MemStorage,
    strategy: UnitLookupStrategy,
) -> Harness {
    let units = Arc::new(unit_store);
    let requests = Arc::new(request_store);
    let storage = Arc::new(storage);
    let resolver = UnitResolver::new(units.clone(), Arc::new(resident_store), strategy);
    let guard = SubmissionGuard::new(resolver, requests.clone(), storage.clone(), photo_policy());
    Harness {
        gate: QrGate::new(Arc::new(society_store)),
        guard,
        units,
        requests,
        storage,
    }
}

fn default_harness() -> Harness {
    let resident_uid = Uuid::from_u128(1);
    let mut names = HashMap::new();
    names.insert(resident_uid, "Ravi Kumar".to_string());
    harness_with(
        FakeSocietyStore {
            society: Some(society(SocietyStatus::Active, "secret-key", 30)),
            fail: false,
        },
        FakeUnitStore {
            units: vec![unit("A-101", Some(resident_uid)), unit("B-205", None)],
            lookups: AtomicUsize::new(0),
        },
        FakeResidentStore {
            names,
            fail: false,
        },
        FakeRequestStore::default(),
        MemStorage::default(),
        UnitLookupStrategy::Keyed,
    )
}

fn ctx() -> IntakeContext {
    IntakeContext::new(SOCIETY_ID)
}

// ---- QR gate ----

#[tokio::test]
async fn gate_grants_only_when_every_condition_holds() {
    let h = default_harness();
    assert_eq!(
        h.gate.validate(SOCIETY_ID, "secret-key").await,
        GateDecision::Granted
    );
    // Tokens are compared after trimming both sides.
    assert_eq!(
        h.gate.validate(SOCIETY_ID, "  secret-key  ").await,
        GateDecision::Granted
    );
}

#[tokio::test]
async fn gate_denies_wrong_key_and_empty_key() {
    let h = default_harness();
    assert_eq!(
        h.gate.validate(SOCIETY_ID, "wrong-key").await,
        GateDecision::Denied
    );
    assert_eq!(h.gate.validate(SOCIETY_ID, "").await, GateDecision::Denied);
    assert_eq!(h.gate.validate(SOCIETY_ID, "   ").await, GateDecision::Denied);
}

#[tokio::test]
async fn gate_denies_inactive_society() {
    let h = harness_with(
        FakeSocietyStore {
            society: Some(society(SocietyStatus::Inactive, "secret-key", 30)),
            fail: false,
        },
        FakeUnitStore::default(),
        FakeResidentStore::default(),
        FakeRequestStore::default(),
        MemStorage::default(),
        UnitLookupStrategy::Keyed,
    );
    assert_eq!(
        h.gate.validate(SOCIETY_ID, "secret-key").await,
        GateDecision::Denied
    );
}

#[tokio::test]
async fn gate_denies_expired_and_missing_expiry() {
    // Scenario B: expiry in the past.
    let h = harness_with(
        FakeSocietyStore {
            society: Some(society(SocietyStatus::Active, "secret-key", -5)),
            fail: false,
        },
        FakeUnitStore::default(),
        FakeResidentStore::default(),
        FakeRequestStore::default(),
        MemStorage::default(),
        UnitLookupStrategy::Keyed,
    );
    assert_eq!(
        h.gate.validate(SOCIETY_ID, "secret-key").await,
        GateDecision::Denied
    );

    let mut no_expiry = society(SocietyStatus::Active, "secret-key", 30);
    no_expiry.qr_expiry = None;
    let h = harness_with(
        FakeSocietyStore {
            society: Some(no_expiry),
            fail: false,
        },
        FakeUnitStore::default(),
        FakeResidentStore::default(),
        FakeRequestStore::default(),
        MemStorage::default(),
        UnitLookupStrategy::Keyed,
    );
    assert_eq!(
        h.gate.validate(SOCIETY_ID, "secret-key").await,
        GateDecision::Denied
    );
}

#[tokio::test]
async fn gate_denies_empty_stored_key_even_if_presented_matches() {
    let h = harness_with(
        FakeSocietyStore {
            society: Some(society(SocietyStatus::Active, "  ", 30)),
            fail: false,
        },
        FakeUnitStore::default(),
        FakeResidentStore::default(),
        FakeRequestStore::default(),
        MemStorage::default(),
        UnitLookupStrategy::Keyed,
    );
    assert_eq!(h.gate.validate(SOCIETY_ID, "  ").await, GateDecision::Denied);
}

#[tokio::test]
async fn gate_fails_closed_on_missing_society_and_store_fault() {
    let h = default_harness();
    assert_eq!(
        h.gate.validate(Uuid::new_v4(), "secret-key").await,
        GateDecision::Denied
    );

    let h = harness_with(
        FakeSocietyStore {
            society: None,
            fail: true,
        },
        FakeUnitStore::default(),
        FakeResidentStore::default(),
        FakeRequestStore::default(),
        MemStorage::default(),
        UnitLookupStrategy::Keyed,
    );
    assert_eq!(
        h.gate.validate(SOCIETY_ID, "secret-key").await,
        GateDecision::Denied
    );
}

// ---- Submission guard ----

#[tokio::test]
async fn scenario_a_valid_submission_creates_pending_qr_request() {
    let h = default_harness();
    let outcome = h
        .guard
        .submit(&ctx(), &submission("9876543210", " a-101 "), Some(photo()))
        .await
        .unwrap();

    let request = &outcome.request;
    assert_eq!(request.status, RequestStatus::Pending);
    assert_eq!(request.source, RequestSource::Qr);
    assert_eq!(request.unit_no, "A-101");
    assert_eq!(request.name, "Asha Rao");
    assert_eq!(request.phone, "9876543210");
    assert_eq!(request.purpose, Purpose::Guest);
    assert_eq!(request.vehicle_number, None);
    assert_eq!(request.resident_uid, Uuid::from_u128(1));
    assert_eq!(outcome.resident_name.as_deref(), Some("Ravi Kumar"));

    // The photo is durable and the URL points at the stored key.
    assert!(request.photo_url.ends_with(&request.photo_key));
    assert_eq!(
        h.storage.download(&request.photo_key).await.unwrap(),
        b"jpeg-bytes"
    );
}

#[tokio::test]
async fn round_trip_preserves_submitted_fields_verbatim() {
    let h = default_harness();
    let mut form = submission("9876543210", "a-101");
    form.purpose = " Cab / Driver ".to_string();
    form.vehicle_number = " mh12ab1234 ".to_string();

    let outcome = h.guard.submit(&ctx(), &form, Some(photo())).await.unwrap();

    let stored = &h.requests.created()[0];
    assert_eq!(stored.id, outcome.request.id);
    assert_eq!(stored.name, "Asha Rao");
    assert_eq!(stored.purpose, Purpose::CabDriver);
    // The vehicle number is trimmed but never case-normalized; only the
    // unit identifier is uppercased.
    assert_eq!(stored.vehicle_number.as_deref(), Some("mh12ab1234"));
    assert_eq!(stored.unit_no, "A-101");
}

#[tokio::test]
async fn scenario_c_unassigned_unit_fails_before_any_upload() {
    let h = default_harness();
    let err = h
        .guard
        .submit(&ctx(), &submission("9876543210", "B-205"), Some(photo()))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::NoResidentAssigned(ref u) if u == "B-205"));
    assert_eq!(h.storage.object_count(), 0);
    assert!(h.requests.created().is_empty());
}

#[tokio::test]
async fn unknown_unit_is_reported_distinctly() {
    let h = default_harness();
    let err = h
        .guard
        .submit(&ctx(), &submission("9876543210", "Z-999"), Some(photo()))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::UnitNotFound(ref u) if u == "Z-999"));
}

#[tokio::test]
async fn scenario_d_duplicate_pending_is_rejected_on_every_retry() {
    let resident_uid = Uuid::from_u128(1);
    let h = harness_with(
        FakeSocietyStore {
            society: Some(society(SocietyStatus::Active, "secret-key", 30)),
            fail: false,
        },
        FakeUnitStore {
            units: vec![unit("C-102", Some(resident_uid))],
            lookups: AtomicUsize::new(0),
        },
        FakeResidentStore::default(),
        FakeRequestStore::default(),
        MemStorage::default(),
        UnitLookupStrategy::Keyed,
    );

    let form = submission("9876543210", "C-102");
    h.guard.submit(&ctx(), &form, Some(photo())).await.unwrap();

    for _ in 0..3 {
        let err = h
            .guard
            .submit(&ctx(), &form, Some(photo()))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::DuplicatePending { .. }));
    }
    assert_eq!(h.requests.created().len(), 1);
}

#[tokio::test]
async fn scenario_e_short_phone_fails_before_any_remote_call() {
    let h = default_harness();
    let err = h
        .guard
        .submit(&ctx(), &submission("98765", "A-101"), Some(photo()))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(h.units.lookups.load(Ordering::SeqCst), 0);
    assert_eq!(h.storage.object_count(), 0);
}

#[tokio::test]
async fn missing_photo_and_bad_photo_are_validation_errors() {
    let h = default_harness();
    let err = h
        .guard
        .submit(&ctx(), &submission("9876543210", "A-101"), None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(ref m) if m == "Photo is required"));

    let bad_photo = PhotoUpload {
        filename: "visitor.gif".to_string(),
        content_type: "image/gif".to_string(),
        data: Bytes::from_static(b"gif-bytes"),
    };
    let err = h
        .guard
        .submit(&ctx(), &submission("9876543210", "A-101"), Some(bad_photo))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn unknown_purpose_is_rejected() {
    let h = default_harness();
    let mut form = submission("9876543210", "A-101");
    form.purpose = "Sightseeing".to_string();
    let err = h.guard.submit(&ctx(), &form, Some(photo())).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn resident_name_failure_never_blocks_submission() {
    let resident_uid = Uuid::from_u128(1);
    let h = harness_with(
        FakeSocietyStore {
            society: Some(society(SocietyStatus::Active, "secret-key", 30)),
            fail: false,
        },
        FakeUnitStore {
            units: vec![unit("A-101", Some(resident_uid))],
            lookups: AtomicUsize::new(0),
        },
        FakeResidentStore {
            names: HashMap::new(),
            fail: true,
        },
        FakeRequestStore::default(),
        MemStorage::default(),
        UnitLookupStrategy::Keyed,
    );

    let outcome = h
        .guard
        .submit(&ctx(), &submission("9876543210", "A-101"), Some(photo()))
        .await
        .unwrap();
    assert_eq!(outcome.resident_name, None);
    assert_eq!(outcome.request.status, RequestStatus::Pending);
}

#[tokio::test]
async fn both_lookup_strategies_converge() {
    let resident_uid = Uuid::from_u128(7);
    for strategy in [UnitLookupStrategy::Keyed, UnitLookupStrategy::Filtered] {
        let h = harness_with(
            FakeSocietyStore {
                society: Some(society(SocietyStatus::Active, "secret-key", 30)),
                fail: false,
            },
            FakeUnitStore {
                units: vec![unit("A-101", Some(resident_uid))],
                lookups: AtomicUsize::new(0),
            },
            FakeResidentStore::default(),
            FakeRequestStore::default(),
            MemStorage::default(),
            strategy,
        );
        let outcome = h
            .guard
            .submit(&ctx(), &submission("9876543210", "a-101"), Some(photo()))
            .await
            .unwrap();
        assert_eq!(outcome.request.unit_no, "A-101");
        assert_eq!(outcome.request.resident_uid, resident_uid);
    }
}

#[tokio::test]
async fn upload_failure_surfaces_as_storage_error_without_a_record() {
    let resident_uid = Uuid::from_u128(1);
    let h = harness_with(
        FakeSocietyStore {
            society: Some(society(SocietyStatus::Active, "secret-key", 30)),
            fail: false,
        },
        FakeUnitStore {
            units: vec![unit("A-101", Some(resident_uid))],
            lookups: AtomicUsize::new(0),
        },
        FakeResidentStore::default(),
        FakeRequestStore::default(),
        MemStorage {
            fail_upload: true,
            ..MemStorage::default()
        },
        UnitLookupStrategy::Keyed,
    );

    let err = h
        .guard
        .submit(&ctx(), &submission("9876543210", "A-101"), Some(photo()))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Storage(_)));
    assert!(h.requests.created().is_empty());
}

#[tokio::test]
async fn failed_record_write_cleans_up_the_uploaded_photo() {
    let resident_uid = Uuid::from_u128(1);
    let h = harness_with(
        FakeSocietyStore {
            society: Some(society(SocietyStatus::Active, "secret-key", 30)),
            fail: false,
        },
        FakeUnitStore {
            units: vec![unit("A-101", Some(resident_uid))],
            lookups: AtomicUsize::new(0),
        },
        FakeResidentStore::default(),
        FakeRequestStore {
            fail_create: true,
            ..FakeRequestStore::default()
        },
        MemStorage::default(),
        UnitLookupStrategy::Keyed,
    );

    let err = h
        .guard
        .submit(&ctx(), &submission("9876543210", "A-101"), Some(photo()))
        .await
        .unwrap_err();

    // The write failure is surfaced and the uploaded photo is gone.
    assert!(matches!(err, AppError::Internal(_)));
    assert_eq!(h.storage.object_count(), 0);
    assert_eq!(h.storage.deleted.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn orphaned_photo_is_reported_when_cleanup_also_fails() {
    let resident_uid = Uuid::from_u128(1);
    let h = harness_with(
        FakeSocietyStore {
            society: Some(society(SocietyStatus::Active, "secret-key", 30)),
            fail: false,
        },
        FakeUnitStore {
            units: vec![unit("A-101", Some(resident_uid))],
            lookups: AtomicUsize::new(0),
        },
        FakeResidentStore::default(),
        FakeRequestStore {
            fail_create: true,
            ..FakeRequestStore::default()
        },
        MemStorage {
            fail_delete: true,
            ..MemStorage::default()
        },
        UnitLookupStrategy::Keyed,
    );

    let err = h
        .guard
        .submit(&ctx(), &submission("9876543210", "A-101"), Some(photo()))
        .await
        .unwrap_err();

    match err {
        AppError::OrphanedUpload { photo_key, .. } => {
            assert!(photo_key.starts_with(&format!("visitor_photos/{}/", SOCIETY_ID)));
            // The object really is still there, orphaned.
            assert_eq!(h.storage.object_count(), 1);
        }
        other => panic!("expected OrphanedUpload, got {:?}", other),
    }
}
