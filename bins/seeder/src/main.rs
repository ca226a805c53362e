//! Database seeder for Scholaris development and testing.
//!
//! Seeds one school with an administrator, a teacher, two students, a fee
//! schedule and an opening invoice, then prints bearer tokens for each user.
//!
//! Usage: cargo run --bin seeder

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use scholaris_core::billing::{CreateInvoiceInput, DocumentNumbering, InvoiceItemInput};
use scholaris_core::tenancy::TenantScope;
use scholaris_db::InvoiceRepository;
use scholaris_db::entities::{
    fee_structures, invoices, schools,
    sea_orm_active_enums::{FeeFrequency, UserRole},
    students, users,
};
use scholaris_shared::types::{SchoolId, StudentId};
use scholaris_shared::{AppConfig, JwtConfig, JwtService, Role};

/// Test school ID (consistent for all seeds)
const TEST_SCHOOL_ID: Uuid = Uuid::from_u128(0x01);
const ADMIN_USER_ID: Uuid = Uuid::from_u128(0x02);
const TEACHER_USER_ID: Uuid = Uuid::from_u128(0x03);

/// Seeded students: (user id, student id, code, first name, last name, email).
const STUDENTS: [(Uuid, Uuid, &str, &str, &str, &str); 2] = [
    (
        Uuid::from_u128(0x11),
        Uuid::from_u128(0x21),
        "STU-0001",
        "Ada",
        "Lovelace",
        "ada@greenfield.test",
    ),
    (
        Uuid::from_u128(0x12),
        Uuid::from_u128(0x22),
        "STU-0002",
        "Alan",
        "Turing",
        "alan@greenfield.test",
    ),
];

/// Fee schedule: (name, amount in cents).
/// Seeded fee schedule: (name, amount in cents, frequency, optional).
const FEES: [(&str, i64, FeeFrequency, bool); 3] = [
    ("Tuition - Term 1", 120_000, FeeFrequency::Quarterly, false),
    ("Library Fee", 4_500, FeeFrequency::Yearly, false),
    ("Laboratory Fee", 8_050, FeeFrequency::Yearly, true),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;

    println!("Connecting to database...");
    let db = scholaris_db::connect_with(&config.database).await?;

    println!("Seeding test school...");
    seed_school(&db).await?;

    println!("Seeding users...");
    seed_user(
        &db,
        ADMIN_USER_ID,
        "admin@greenfield.test",
        "Grace",
        "Hopper",
        UserRole::SchoolAdmin,
    )
    .await?;
    seed_user(
        &db,
        TEACHER_USER_ID,
        "teacher@greenfield.test",
        "Edsger",
        "Dijkstra",
        UserRole::Teacher,
    )
    .await?;

    println!("Seeding students...");
    seed_students(&db).await?;

    println!("Seeding fee structures...");
    let fees = seed_fee_structures(&db).await?;

    println!("Seeding opening invoice...");
    seed_invoice(&db, &DocumentNumbering::from(&config.billing), &fees).await?;

    println!("Seeding complete!");

    print_tokens(&JwtService::new(JwtConfig::from(&config.jwt)))?;

    Ok(())
}

async fn seed_school(db: &DatabaseConnection) -> anyhow::Result<()> {
    if schools::Entity::find_by_id(TEST_SCHOOL_ID).one(db).await?.is_some() {
        println!("  Test school already exists, skipping...");
        return Ok(());
    }

    let now = Utc::now().fixed_offset();
    schools::ActiveModel {
        id: Set(TEST_SCHOOL_ID),
        name: Set("Greenfield Academy".to_string()),
        code: Set("GREENFIELD".to_string()),
        created_at: Set(now),
        updated_at: Set(now),
        deleted_at: Set(None),
    }
    .insert(db)
    .await?;

    println!("  Created school: Greenfield Academy");
    Ok(())
}

async fn seed_user(
    db: &DatabaseConnection,
    id: Uuid,
    email: &str,
    first_name: &str,
    last_name: &str,
    role: UserRole,
) -> anyhow::Result<()> {
    if users::Entity::find_by_id(id).one(db).await?.is_some() {
        println!("  User {email} already exists, skipping...");
        return Ok(());
    }

    let now = Utc::now().fixed_offset();
    users::ActiveModel {
        id: Set(id),
        school_id: Set(Some(TEST_SCHOOL_ID)),
        email: Set(email.to_string()),
        first_name: Set(first_name.to_string()),
        last_name: Set(last_name.to_string()),
        role: Set(role),
        created_at: Set(now),
        updated_at: Set(now),
        deleted_at: Set(None),
    }
    .insert(db)
    .await?;

    println!("  Created user: {email}");
    Ok(())
}

async fn seed_students(db: &DatabaseConnection) -> anyhow::Result<()> {
    for (user_id, student_id, code, first_name, last_name, email) in STUDENTS {
        seed_user(db, user_id, email, first_name, last_name, UserRole::Student).await?;

        if students::Entity::find_by_id(student_id).one(db).await?.is_some() {
            println!("  Student {code} already exists, skipping...");
            continue;
        }

        let now = Utc::now().fixed_offset();
        students::ActiveModel {
            id: Set(student_id),
            school_id: Set(TEST_SCHOOL_ID),
            user_id: Set(user_id),
            student_code: Set(code.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
        }
        .insert(db)
        .await?;

        println!("  Created student: {code}");
    }
    Ok(())
}

async fn seed_fee_structures(
    db: &DatabaseConnection,
) -> anyhow::Result<Vec<fee_structures::Model>> {
    let mut fees = Vec::with_capacity(FEES.len());

    for (index, (name, cents, frequency, is_optional)) in (1_u128..).zip(FEES) {
        let id = Uuid::from_u128(0x100 + index);
        if let Some(existing) = fee_structures::Entity::find_by_id(id).one(db).await? {
            println!("  Fee {name} already exists, skipping...");
            fees.push(existing);
            continue;
        }

        let now = Utc::now().fixed_offset();
        let fee = fee_structures::ActiveModel {
            id: Set(id),
            school_id: Set(TEST_SCHOOL_ID),
            name: Set(name.to_string()),
            description: Set(None),
            amount: Set(Decimal::new(cents, 2)),
            frequency: Set(frequency),
            is_optional: Set(is_optional),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
        }
        .insert(db)
        .await?;

        println!("  Created fee: {name} ({})", fee.amount);
        fees.push(fee);
    }

    Ok(fees)
}

async fn seed_invoice(
    db: &DatabaseConnection,
    numbering: &DocumentNumbering,
    fees: &[fee_structures::Model],
) -> anyhow::Result<()> {
    let (_, student_id, code, ..) = STUDENTS[0];

    let existing = invoices::Entity::find()
        .filter(invoices::Column::StudentId.eq(student_id))
        .one(db)
        .await?;
    if existing.is_some() {
        println!("  Student {code} already has an invoice, skipping...");
        return Ok(());
    }

    let items = fees
        .iter()
        .map(|fee| InvoiceItemInput {
            fee_structure_id: Some(fee.id),
            ..InvoiceItemInput::new(fee.name.clone(), fee.amount)
        })
        .collect();

    let input = CreateInvoiceInput {
        student_id: StudentId::from_uuid(student_id),
        issue_date: None,
        due_date: (Utc::now() + Duration::days(30)).date_naive(),
        items,
        discount: Decimal::new(2_500, 2),
        tax: Decimal::ZERO,
        notes: Some("Opening balance for the term".to_string()),
    };

    let scope = TenantScope::School(SchoolId::from_uuid(TEST_SCHOOL_ID));
    let details = InvoiceRepository::new(db.clone(), numbering.clone())
        .create(input, &scope)
        .await?;

    println!(
        "  Created invoice {} for {code}: total {}",
        details.invoice.invoice_number, details.invoice.total_amount
    );
    Ok(())
}

fn print_tokens(jwt: &JwtService) -> anyhow::Result<()> {
    println!();
    println!("Development tokens:");

    let school = Some(TEST_SCHOOL_ID);
    let (student_user, _, _, _, _, student_email) = STUDENTS[0];
    let holders = [
        (ADMIN_USER_ID, "admin@greenfield.test", Role::SchoolAdmin, school),
        (TEACHER_USER_ID, "teacher@greenfield.test", Role::Teacher, school),
        (student_user, student_email, Role::Student, school),
        (Uuid::from_u128(0xFF), "ops@scholaris.test", Role::SuperAdmin, None),
    ];

    for (user_id, email, role, school_id) in holders {
        let token = jwt.generate_access_token(user_id, email, role, school_id)?;
        println!("  {role}: {token}");
    }
    Ok(())
}
