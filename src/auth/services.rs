use lazy_static::lazy_static;
use regex::Regex;
use time::{macros::format_description, Date};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    auth::{
        dto::{LoginRequest, RegisterRequest},
        password::PasswordHasher,
        repo::CredentialStore,
        repo_types::{NewUser, Role, UserRecord},
    },
    error::AuthError,
};

const MIN_PASSWORD_LEN: usize = 8;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn is_all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Which column a login identifier is looked up by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginIdentifier<'a> {
    NationalId(&'a str),
    AccountName(&'a str),
}

impl<'a> LoginIdentifier<'a> {
    /// Purely numeric input is a cédula; anything else is an account name.
    pub fn classify(raw: &'a str) -> Self {
        if is_all_digits(raw) {
            LoginIdentifier::NationalId(raw)
        } else {
            LoginIdentifier::AccountName(raw)
        }
    }
}

/// What a successful login hands back to the caller.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub user_id: Uuid,
    pub role: Role,
    pub name: String,
}

impl From<&UserRecord> for LoginOutcome {
    fn from(user: &UserRecord) -> Self {
        Self {
            user_id: user.id,
            role: user.role,
            name: user.display_name(),
        }
    }
}

/// Registration payload after presence and format checks.
struct ValidRegistration {
    national_id: String,
    phone: String,
    first_name: String,
    last_name: String,
    email: String,
    birth_date: Date,
    password: String,
}

fn take(field: Option<String>) -> Option<String> {
    field.filter(|v| !v.trim().is_empty())
}

fn validate_registration(req: RegisterRequest) -> Result<ValidRegistration, AuthError> {
    let fields = [
        ("cedula", take(req.cedula)),
        ("telefono", take(req.telefono)),
        ("nombre", take(req.nombre)),
        ("apellido", take(req.apellido)),
        ("email", take(req.email)),
        ("fecha_nacimiento", take(req.fecha_nacimiento)),
        ("password", take(req.password)),
    ];
    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, v)| v.is_none())
        .map(|(k, _)| *k)
        .collect();
    if !missing.is_empty() {
        return Err(AuthError::Validation(format!(
            "Campos requeridos faltantes: {}",
            missing.join(", ")
        )));
    }

    let [cedula, telefono, nombre, apellido, email, fecha, password] =
        fields.map(|(_, v)| v.unwrap_or_default());

    let national_id = cedula.trim().to_string();
    let email = email.trim().to_lowercase();
    let mut problems = Vec::new();

    if !is_all_digits(&national_id) {
        problems.push("cedula debe contener solo dígitos");
    }
    if !is_valid_email(&email) {
        problems.push("email no es válido");
    }
    let birth_date = Date::parse(fecha.trim(), format_description!("[year]-[month]-[day]"));
    if birth_date.is_err() {
        problems.push("fecha_nacimiento debe tener el formato AAAA-MM-DD");
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        problems.push("password debe tener al menos 8 caracteres");
    }

    match birth_date {
        Ok(birth_date) if problems.is_empty() => Ok(ValidRegistration {
            national_id,
            phone: telefono.trim().to_string(),
            first_name: nombre.trim().to_string(),
            last_name: apellido.trim().to_string(),
            email,
            birth_date,
            password,
        }),
        _ => Err(AuthError::Validation(format!(
            "Datos inválidos: {}",
            problems.join("; ")
        ))),
    }
}

fn validate_login(req: LoginRequest) -> Result<(String, String), AuthError> {
    match (take(req.user), take(req.pass)) {
        (Some(user), Some(pass)) => Ok((user.trim().to_string(), pass)),
        _ => Err(AuthError::Validation(
            "Usuario y contraseña son requeridos".into(),
        )),
    }
}

/// Registration flow: validate, hash off the async runtime, insert as client.
pub async fn register_user(
    store: &dyn CredentialStore,
    hasher: &PasswordHasher,
    req: RegisterRequest,
) -> Result<(), AuthError> {
    let reg = validate_registration(req)?;

    let hasher = hasher.clone();
    let password = reg.password;
    let password_hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
        .await
        .map_err(|e| AuthError::Unexpected(e.into()))?
        .map_err(|e| AuthError::Unexpected(e.into()))?;

    let user = NewUser {
        national_id: reg.national_id,
        phone: reg.phone,
        first_name: reg.first_name,
        last_name: reg.last_name,
        email: reg.email,
        birth_date: reg.birth_date,
        password_hash,
    };

    if let Err(e) = store.insert_user(&user).await {
        warn!(cedula = %user.national_id, error = %e, "register failed");
        return Err(e.into());
    }

    info!(cedula = %user.national_id, email = %user.email, "user registered");
    Ok(())
}

/// Authentication flow. Exactly one lookup per call, chosen by
/// [`LoginIdentifier::classify`]; a miss and a wrong password are the same
/// outcome to the caller.
pub async fn authenticate(
    store: &dyn CredentialStore,
    hasher: &PasswordHasher,
    req: LoginRequest,
) -> Result<LoginOutcome, AuthError> {
    let (identifier, password) = validate_login(req)?;

    let kind = LoginIdentifier::classify(&identifier);
    debug!(?kind, "login lookup");
    let found = match kind {
        LoginIdentifier::NationalId(id) => store.find_by_national_id(id).await?,
        LoginIdentifier::AccountName(name) => store.find_by_account_name(name).await?,
    };

    let hasher = hasher.clone();
    let (found, matched) = tokio::task::spawn_blocking(move || match found {
        Some(user) => {
            let ok = hasher.verify(&password, &user.password_hash);
            (Some(user), ok)
        }
        None => {
            hasher.verify_dummy(&password);
            (None, false)
        }
    })
    .await
    .map_err(|e| AuthError::Unexpected(e.into()))?;

    match found {
        Some(user) if matched => {
            info!(
                user_id = %user.id,
                cedula = ?user.national_id,
                username = ?user.account_name,
                email = %user.email,
                role = %user.role,
                "user logged in"
            );
            Ok(LoginOutcome::from(&user))
        }
        Some(user) => {
            warn!(user_id = %user.id, "login invalid password");
            Err(AuthError::AuthenticationFailure)
        }
        None => {
            warn!(identifier = %identifier, "login unknown identifier");
            Err(AuthError::AuthenticationFailure)
        }
    }
}
