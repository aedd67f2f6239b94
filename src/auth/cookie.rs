//! Defines functions for handling user authentication with cookies.
//!
//! Two signed private cookies track a signed-in user: one holds the user
//! ID, the other the expiry date-time. The expiry lives in a cookie value
//! (not just the cookie's `Expires` attribute) because browsers do not send
//! attributes back, and the server needs to reject stale sessions itself.

use std::cmp::max;

use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};
use time::{Duration, OffsetDateTime, format_description::BorrowedFormatItem, macros::format_description};

use crate::{Error, auth::UserID};

pub(crate) const COOKIE_USER_ID: &str = "user_id";
pub(crate) const COOKIE_EXPIRY: &str = "expiry";

/// The default duration for which auth cookies are valid.
pub(crate) const DEFAULT_COOKIE_DURATION: Duration = Duration::minutes(30);

/// Date time format for the expiry cookie, e.g. "2021-01-01 00:00:00.000000 +00:00:00".
const DATE_TIME_FORMAT: &[BorrowedFormatItem] = format_description!(
    "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond] [offset_hour \
         sign:mandatory]:[offset_minute]:[offset_second]"
);

fn build_auth_cookie(name: &str, value: String, expiry: OffsetDateTime) -> Cookie<'static> {
    Cookie::build((name.to_owned(), value))
        .expires(expiry)
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(true)
        .build()
}

/// Add the auth cookies to the jar, marking `user_id` as signed in until
/// `duration` from now.
///
/// # Errors
///
/// Returns [Error::InvalidDateFormat] if the expiry date-time cannot be
/// formatted.
pub(crate) fn set_auth_cookie(
    jar: PrivateCookieJar,
    user_id: UserID,
    duration: Duration,
) -> Result<PrivateCookieJar, Error> {
    let expiry = OffsetDateTime::now_utc() + duration;
    // Format instead of to_string: to_string prints single digit hours
    // around midnight, which DATE_TIME_FORMAT cannot parse back.
    let expiry_string = expiry
        .format(DATE_TIME_FORMAT)
        .map_err(|error| Error::InvalidDateFormat(error.to_string(), expiry.to_string()))?;

    Ok(jar
        .add(build_auth_cookie(
            COOKIE_USER_ID,
            user_id.as_i64().to_string(),
            expiry,
        ))
        .add(build_auth_cookie(COOKIE_EXPIRY, expiry_string, expiry)))
}

/// Overwrite the auth cookies with dead values and a max age of zero, which
/// deletes them on the client.
pub(crate) fn invalidate_auth_cookie(jar: PrivateCookieJar) -> PrivateCookieJar {
    let expired = |name: &str| {
        Cookie::build((name.to_owned(), "deleted".to_owned()))
            .expires(OffsetDateTime::UNIX_EPOCH)
            .max_age(Duration::ZERO)
            .http_only(true)
            .same_site(SameSite::Strict)
            .secure(true)
            .build()
    };

    jar.add(expired(COOKIE_USER_ID)).add(expired(COOKIE_EXPIRY))
}

/// Push the auth cookie expiry out to now plus `duration`, unless the
/// current expiry is already later.
///
/// # Errors
///
/// The cookie jar is not modified if an error is returned.
///
/// Returns [Error::CookieMissing] if either auth cookie is absent, or
/// [Error::InvalidDateFormat] if the expiry cannot be parsed or formatted.
pub(crate) fn extend_auth_cookie(
    jar: PrivateCookieJar,
    duration: Duration,
) -> Result<PrivateCookieJar, Error> {
    let mut user_id_cookie = jar.get(COOKIE_USER_ID).ok_or(Error::CookieMissing)?;
    let expiry_cookie = jar.get(COOKIE_EXPIRY).ok_or(Error::CookieMissing)?;
    let current_expiry = parse_expiry(&expiry_cookie)?;

    let expiry = max(current_expiry, OffsetDateTime::now_utc() + duration);
    let expiry_string = expiry
        .format(DATE_TIME_FORMAT)
        .map_err(|error| Error::InvalidDateFormat(error.to_string(), expiry.to_string()))?;

    user_id_cookie.set_expires(expiry);

    Ok(jar
        .add(user_id_cookie)
        .add(build_auth_cookie(COOKIE_EXPIRY, expiry_string, expiry)))
}

/// Get the signed-in user's ID from the auth cookies.
///
/// # Errors
///
/// Returns [Error::InvalidCredentials] if either cookie is missing or
/// malformed, or if the recorded expiry has passed.
pub(crate) fn get_user_id_from_auth_cookie(jar: &PrivateCookieJar) -> Result<UserID, Error> {
    let user_id_cookie = jar.get(COOKIE_USER_ID).ok_or(Error::InvalidCredentials)?;
    let expiry_cookie = jar.get(COOKIE_EXPIRY).ok_or(Error::InvalidCredentials)?;

    let expiry = parse_expiry(&expiry_cookie).map_err(|_| Error::InvalidCredentials)?;
    if expiry < OffsetDateTime::now_utc() {
        return Err(Error::InvalidCredentials);
    }

    let id: i64 = user_id_cookie
        .value_trimmed()
        .parse()
        .map_err(|_| Error::InvalidCredentials)?;

    Ok(UserID::new(id))
}

fn parse_expiry(cookie: &Cookie) -> Result<OffsetDateTime, Error> {
    OffsetDateTime::parse(cookie.value_trimmed(), DATE_TIME_FORMAT).map_err(|error| {
        Error::InvalidDateFormat(error.to_string(), cookie.value_trimmed().to_owned())
    })
}

#[cfg(test)]
mod cookie_tests {
    use axum_extra::extract::{PrivateCookieJar, cookie::Key};
    use sha2::{Digest, Sha512};
    use time::{Duration, OffsetDateTime};

    use crate::{Error, auth::UserID};

    use super::{
        COOKIE_EXPIRY, COOKIE_USER_ID, DEFAULT_COOKIE_DURATION, extend_auth_cookie,
        get_user_id_from_auth_cookie, invalidate_auth_cookie, parse_expiry, set_auth_cookie,
    };

    fn get_jar() -> PrivateCookieJar {
        let hash = Sha512::digest(b"a test secret");

        PrivateCookieJar::new(Key::from(&hash))
    }

    #[track_caller]
    fn assert_date_time_close(left: OffsetDateTime, right: OffsetDateTime) {
        assert!(
            (left - right).abs() < Duration::seconds(1),
            "got date time {left:?}, want {right:?}"
        );
    }

    #[test]
    fn set_then_get_round_trips_the_user_id() {
        let user_id = UserID::new(7);
        let jar = set_auth_cookie(get_jar(), user_id, DEFAULT_COOKIE_DURATION).unwrap();

        assert_eq!(get_user_id_from_auth_cookie(&jar), Ok(user_id));
    }

    #[test]
    fn set_records_the_expiry_in_the_cookie_value() {
        let jar = set_auth_cookie(get_jar(), UserID::new(1), Duration::minutes(5)).unwrap();

        let expiry_cookie = jar.get(COOKIE_EXPIRY).unwrap();
        let expiry = parse_expiry(&expiry_cookie).unwrap();
        assert_date_time_close(expiry, OffsetDateTime::now_utc() + Duration::minutes(5));
    }

    #[test]
    fn expired_cookie_is_rejected() {
        let jar = set_auth_cookie(get_jar(), UserID::new(1), Duration::minutes(-5)).unwrap();

        assert_eq!(
            get_user_id_from_auth_cookie(&jar),
            Err(Error::InvalidCredentials)
        );
    }

    #[test]
    fn missing_cookies_are_rejected() {
        assert_eq!(
            get_user_id_from_auth_cookie(&get_jar()),
            Err(Error::InvalidCredentials)
        );
    }

    #[test]
    fn extend_pushes_the_expiry_out() {
        let jar = set_auth_cookie(get_jar(), UserID::new(1), Duration::minutes(5)).unwrap();

        let jar = extend_auth_cookie(jar, Duration::minutes(30)).unwrap();

        let expiry = parse_expiry(&jar.get(COOKIE_EXPIRY).unwrap()).unwrap();
        assert_date_time_close(expiry, OffsetDateTime::now_utc() + Duration::minutes(30));
    }

    #[test]
    fn extend_never_shortens_the_expiry() {
        let jar = set_auth_cookie(get_jar(), UserID::new(1), Duration::minutes(30)).unwrap();
        let want = parse_expiry(&jar.get(COOKIE_EXPIRY).unwrap()).unwrap();

        let jar = extend_auth_cookie(jar, Duration::seconds(5)).unwrap();

        let got = parse_expiry(&jar.get(COOKIE_EXPIRY).unwrap()).unwrap();
        assert_date_time_close(got, want);
    }

    #[test]
    fn extend_without_cookies_fails() {
        assert!(matches!(
            extend_auth_cookie(get_jar(), Duration::minutes(5)),
            Err(Error::CookieMissing)
        ));
    }

    #[test]
    fn invalidated_cookies_no_longer_authenticate() {
        let jar = set_auth_cookie(get_jar(), UserID::new(1), DEFAULT_COOKIE_DURATION).unwrap();

        let jar = invalidate_auth_cookie(jar);

        let cookie = jar.get(COOKIE_USER_ID).unwrap();
        assert_eq!(cookie.value(), "deleted");
        assert_eq!(cookie.max_age(), Some(Duration::ZERO));
        assert_eq!(
            get_user_id_from_auth_cookie(&jar),
            Err(Error::InvalidCredentials)
        );
    }
}
