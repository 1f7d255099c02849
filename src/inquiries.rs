//! Inquiries
//!
//! The contact form and the wholesale application. Submissions are validated, logged and
//! acknowledged locally; the form is then reset to empty.

use std::{fmt, mem, str::FromStr};

use thiserror::Error;
use tracing::info;

/// Errors raised by form validation.
#[derive(Debug, Error, PartialEq)]
pub enum InquiryError {
    /// A required field is blank or unselected.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// A select field got a value outside its choices.
    #[error("Invalid {field}: {value}")]
    UnknownChoice {
        /// Field being parsed
        field: &'static str,

        /// Rejected input
        value: String,
    },
}

fn parse_choice<T: Copy>(
    choices: &[T],
    label: fn(T) -> &'static str,
    field: &'static str,
    input: &str,
) -> Result<T, InquiryError> {
    let input = input.trim();

    choices
        .iter()
        .copied()
        .find(|choice| label(*choice).eq_ignore_ascii_case(input))
        .ok_or_else(|| InquiryError::UnknownChoice {
            field,
            value: input.to_string(),
        })
}

/// Topic of a contact message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InquiryType {
    /// General inquiry
    #[default]
    General,

    /// Product support
    Support,

    /// Wholesale orders
    Wholesale,

    /// Returns and exchanges
    Returns,

    /// Warranty claim
    Warranty,
}

impl InquiryType {
    /// Every inquiry type, in form order.
    pub const ALL: [InquiryType; 5] = [
        InquiryType::General,
        InquiryType::Support,
        InquiryType::Wholesale,
        InquiryType::Returns,
        InquiryType::Warranty,
    ];

    /// Form value
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            InquiryType::General => "general",
            InquiryType::Support => "support",
            InquiryType::Wholesale => "wholesale",
            InquiryType::Returns => "returns",
            InquiryType::Warranty => "warranty",
        }
    }
}

/// Kind of business applying for wholesale pricing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusinessType {
    /// Retailer
    Retailer,

    /// Distributor
    Distributor,

    /// Office supplier
    OfficeSupplier,

    /// Interior designer
    InteriorDesigner,

    /// Corporate buyer
    Corporate,

    /// Anything else
    Other,
}

impl BusinessType {
    /// Every business type, in form order.
    pub const ALL: [BusinessType; 6] = [
        BusinessType::Retailer,
        BusinessType::Distributor,
        BusinessType::OfficeSupplier,
        BusinessType::InteriorDesigner,
        BusinessType::Corporate,
        BusinessType::Other,
    ];

    /// Form value
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            BusinessType::Retailer => "retailer",
            BusinessType::Distributor => "distributor",
            BusinessType::OfficeSupplier => "office-supplier",
            BusinessType::InteriorDesigner => "interior-designer",
            BusinessType::Corporate => "corporate",
            BusinessType::Other => "other",
        }
    }
}

/// How long the applicant has been trading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YearsInBusiness {
    /// Up to a year
    UpToOne,

    /// Two to five years
    TwoToFive,

    /// Six to ten years
    SixToTen,

    /// Eleven to twenty years
    ElevenToTwenty,

    /// More than twenty years
    OverTwenty,
}

impl YearsInBusiness {
    /// Every range, in form order.
    pub const ALL: [YearsInBusiness; 5] = [
        YearsInBusiness::UpToOne,
        YearsInBusiness::TwoToFive,
        YearsInBusiness::SixToTen,
        YearsInBusiness::ElevenToTwenty,
        YearsInBusiness::OverTwenty,
    ];

    /// Form value
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            YearsInBusiness::UpToOne => "0-1",
            YearsInBusiness::TwoToFive => "2-5",
            YearsInBusiness::SixToTen => "6-10",
            YearsInBusiness::ElevenToTwenty => "11-20",
            YearsInBusiness::OverTwenty => "20+",
        }
    }
}

/// Chairs the applicant expects to order per order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderVolume {
    /// 5 to 10 chairs
    FiveToTen,

    /// 11 to 25 chairs
    ElevenToTwentyFive,

    /// 26 to 50 chairs
    TwentySixToFifty,

    /// 51 to 100 chairs
    FiftyOneToHundred,

    /// More than 100 chairs
    OverHundred,
}

impl OrderVolume {
    /// Every range, in form order.
    pub const ALL: [OrderVolume; 5] = [
        OrderVolume::FiveToTen,
        OrderVolume::ElevenToTwentyFive,
        OrderVolume::TwentySixToFifty,
        OrderVolume::FiftyOneToHundred,
        OrderVolume::OverHundred,
    ];

    /// Form value
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            OrderVolume::FiveToTen => "5-10",
            OrderVolume::ElevenToTwentyFive => "11-25",
            OrderVolume::TwentySixToFifty => "26-50",
            OrderVolume::FiftyOneToHundred => "51-100",
            OrderVolume::OverHundred => "100+",
        }
    }
}

impl fmt::Display for InquiryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for BusinessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for YearsInBusiness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for OrderVolume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InquiryType {
    type Err = InquiryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_choice(&Self::ALL, Self::as_str, "inquiry type", s)
    }
}

impl FromStr for BusinessType {
    type Err = InquiryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_choice(&Self::ALL, Self::as_str, "business type", s)
    }
}

impl FromStr for YearsInBusiness {
    type Err = InquiryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_choice(&Self::ALL, Self::as_str, "years in business", s)
    }
}

impl FromStr for OrderVolume {
    type Err = InquiryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_choice(&Self::ALL, Self::as_str, "estimated order volume", s)
    }
}

/// Confirmation returned for an accepted submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Acknowledgement {
    /// Which form was submitted
    pub form: &'static str,

    /// Address replies will go to
    pub reply_to: String,
}

fn require(field: &'static str, value: &str) -> Result<(), InquiryError> {
    if value.trim().is_empty() {
        Err(InquiryError::MissingField(field))
    } else {
        Ok(())
    }
}

/// Contact form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactForm {
    /// Sender name (required)
    pub name: String,

    /// Reply address (required)
    pub email: String,

    /// Topic
    pub inquiry_type: InquiryType,

    /// Subject line (required)
    pub subject: String,

    /// Message body (required)
    pub message: String,
}

impl ContactForm {
    /// Check the required fields, in form order.
    ///
    /// # Errors
    ///
    /// Returns [`InquiryError::MissingField`] for the first blank required field.
    pub fn validate(&self) -> Result<(), InquiryError> {
        require("name", &self.name)?;
        require("email", &self.email)?;
        require("subject", &self.subject)?;
        require("message", &self.message)
    }

    /// Validate, log and acknowledge the message, then reset the form.
    ///
    /// # Errors
    ///
    /// Returns an [`InquiryError`] if validation fails. The form is left untouched.
    pub fn submit(&mut self) -> Result<Acknowledgement, InquiryError> {
        self.validate()?;

        let form = mem::take(self);

        info!(
            name = %form.name,
            email = %form.email,
            inquiry_type = %form.inquiry_type,
            subject = %form.subject,
            "contact form submitted"
        );

        Ok(Acknowledgement {
            form: "contact",
            reply_to: form.email,
        })
    }
}

/// Wholesale account application
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WholesaleApplication {
    /// Company name (required)
    pub company_name: String,

    /// Contact person (required)
    pub contact_name: String,

    /// Contact email (required)
    pub email: String,

    /// Contact phone (required)
    pub phone: String,

    /// Business address (required)
    pub address: String,

    /// Kind of business (required)
    pub business_type: Option<BusinessType>,

    /// Years trading (required)
    pub years_in_business: Option<YearsInBusiness>,

    /// Expected order size (required)
    pub estimated_order_volume: Option<OrderVolume>,

    /// Anything else the applicant wants to add
    pub message: String,
}

impl WholesaleApplication {
    /// Check the required fields, in form order.
    ///
    /// # Errors
    ///
    /// Returns [`InquiryError::MissingField`] for the first blank or unselected field.
    pub fn validate(&self) -> Result<(), InquiryError> {
        require("company name", &self.company_name)?;

        if self.business_type.is_none() {
            return Err(InquiryError::MissingField("business type"));
        }

        if self.years_in_business.is_none() {
            return Err(InquiryError::MissingField("years in business"));
        }

        if self.estimated_order_volume.is_none() {
            return Err(InquiryError::MissingField("estimated order volume"));
        }

        require("contact name", &self.contact_name)?;
        require("email", &self.email)?;
        require("phone", &self.phone)?;
        require("address", &self.address)
    }

    /// Validate, log and acknowledge the application, then reset the form.
    ///
    /// # Errors
    ///
    /// Returns an [`InquiryError`] if validation fails. The form is left untouched.
    pub fn submit(&mut self) -> Result<Acknowledgement, InquiryError> {
        self.validate()?;

        let application = mem::take(self);

        info!(
            company = %application.company_name,
            contact = %application.contact_name,
            email = %application.email,
            business_type = ?application.business_type,
            years_in_business = ?application.years_in_business,
            estimated_order_volume = ?application.estimated_order_volume,
            "wholesale application submitted"
        );

        Ok(Acknowledgement {
            form: "wholesale application",
            reply_to: application.email,
        })
    }
}
