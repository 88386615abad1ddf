use std::fmt;

/// A runtime error which is used by all internal components of this
/// crate. It never crosses the [crate::Mechanism] API: mechanisms
/// translate it into their `faulted`/`succeeded` outcome flags.
pub struct SaslRuntimeError
{
    err_code: SaslErrorCode,
    message: String,
}

impl SaslRuntimeError
{
    pub fn new(err_code: SaslErrorCode, msg: String) -> Self
    {
        return SaslRuntimeError{err_code: err_code, message: msg};
    }

    pub fn get_code(&self) -> &SaslErrorCode
    {
        return &self.err_code;
    }
}

impl fmt::Display for SaslRuntimeError
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result
    {
        write!(f, "sasl: {}, {}", self.err_code, self.message)
    }
}
impl fmt::Debug for SaslRuntimeError
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result
    {
        write!(f, "sasl: {}, {}", self.err_code, self.message)
    }
}

#[derive(PartialEq)]
pub enum SaslErrorCode
{
    InternalError,
    VerificationError,
    ExternalError,
    MalformedScramMsg,
    ProtocolViolation,
}

impl fmt::Display for SaslErrorCode
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result
    {
        match *self
        {
            Self::InternalError => write!(f, "Internal Error"),
            Self::VerificationError => write!(f, "Data Verification Error"),
            Self::ExternalError => write!(f, "External Error"),
            Self::MalformedScramMsg => write!(f, "Malformed Scram Message"),
            Self::ProtocolViolation => write!(f, "Protocol Violation"),
        }
    }
}

impl fmt::Debug for SaslErrorCode
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result
    {
        return fmt::Display::fmt(self, f);
    }
}

pub type SaslResult<T> = Result<T, SaslRuntimeError>;

#[macro_export]
macro_rules! sasl_error
{
    ($src:expr,$($arg:tt)*) => (
        return std::result::Result::Err(SaslRuntimeError::new($src, format!($($arg)*)))
    )
}

#[macro_export]
macro_rules! sasl_error_map
{
    ($src:expr,$($arg:tt)*) => (
        SaslRuntimeError::new($src, format!($($arg)*))
    )
}
