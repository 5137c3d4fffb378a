use serde::ser::{self, Serialize};
use std::io::Write;

#[derive(Debug)]
pub(crate) struct Error(std::io::Error);

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self(e)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::error::Error for Error {}

impl ser::Error for Error {
    fn custom<T: std::fmt::Display>(msg: T) -> Self {
        Self(std::io::Error::other(msg.to_string()))
    }
}

// A TOML-like report writer
//
// Top-level structs are written as `key=value` lines under `[title]`
// headers, nested values are written inline. Floats keep 4 decimals.
pub(crate) struct Logger<W: Write> {
    w: W,
    depth: usize,
}

impl<W: Write> Logger<W> {
    pub(crate) fn new(w: W) -> Self {
        Self { w, depth: 0 }
    }

    pub(crate) fn top_title(&mut self, title: &str) -> std::io::Result<()> {
        writeln!(self.w, "[{title}]")
    }

    pub(crate) fn title(&mut self, title: &str) -> std::io::Result<()> {
        writeln!(self.w, "\n[{title}]")
    }

    pub(crate) fn log<S: Serialize>(&mut self, s: S) -> std::io::Result<()> {
        s.serialize(&mut *self).map_err(|Error(e)| e)
    }

    pub(crate) fn flush(&mut self) -> std::io::Result<()> {
        self.w.flush()
    }

    // Start a compound value, `close: None` for the line mode
    fn compound<'a>(
        log: &'a mut Self,
        open: &str,
        close: Option<&'static str>,
    ) -> Result<Compound<'a, W>, Error> {
        write!(log.w, "{open}")?;
        log.depth += 1;
        Ok(Compound { log, first: true, close })
    }

    fn record(log: &mut Self) -> Result<Compound<'_, W>, Error> {
        if log.depth == 0 {
            Self::compound(log, "", None)
        } else {
            Self::compound(log, "(", Some(")"))
        }
    }
}

macro_rules! impl_display {
    ($($method:ident: $ty:ty),+ $(,)?) => {$(
        fn $method(self, v: $ty) -> Result<(), Error> {
            Ok(write!(self.w, "{v}")?)
        }
    )+};
}

impl<'a, W: Write> ser::Serializer for &'a mut Logger<W> {
    type Ok = ();
    type Error = Error;
    type SerializeSeq = Compound<'a, W>;
    type SerializeTuple = Compound<'a, W>;
    type SerializeTupleStruct = Compound<'a, W>;
    type SerializeTupleVariant = Compound<'a, W>;
    type SerializeMap = Compound<'a, W>;
    type SerializeStruct = Compound<'a, W>;
    type SerializeStructVariant = Compound<'a, W>;

    impl_display!(
        serialize_bool: bool,
        serialize_i8: i8,
        serialize_i16: i16,
        serialize_i32: i32,
        serialize_i64: i64,
        serialize_u8: u8,
        serialize_u16: u16,
        serialize_u32: u32,
        serialize_u64: u64,
        serialize_char: char,
        serialize_str: &str,
        serialize_unit_struct: &'static str,
    );

    fn serialize_f32(self, v: f32) -> Result<(), Error> {
        self.serialize_f64(v.into())
    }

    fn serialize_f64(self, v: f64) -> Result<(), Error> {
        Ok(write!(self.w, "{v:.04}")?)
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<(), Error> {
        use ser::SerializeSeq as _;
        let mut seq = self.serialize_seq(Some(v.len()))?;
        v.iter().try_for_each(|b| seq.serialize_element(b))?;
        seq.end()
    }

    fn serialize_none(self) -> Result<(), Error> {
        Ok(write!(self.w, "none")?)
    }

    fn serialize_some<T>(self, value: &T) -> Result<(), Error>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<(), Error> {
        Ok(())
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<(), Error> {
        Ok(write!(self.w, "{variant}")?)
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<(), Error>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<(), Error>
    where
        T: ?Sized + Serialize,
    {
        write!(self.w, "{variant}(")?;
        value.serialize(&mut *self)?;
        Ok(write!(self.w, ")")?)
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq, Error> {
        Logger::compound(self, "[", Some("]"))
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple, Error> {
        Logger::compound(self, "(", Some(")"))
    }

    fn serialize_tuple_struct(
        self,
        name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct, Error> {
        write!(self.w, "{name}")?;
        Logger::compound(self, "(", Some(")"))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant, Error> {
        write!(self.w, "{variant}")?;
        Logger::compound(self, "(", Some(")"))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap, Error> {
        Logger::record(self)
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStruct, Error> {
        Logger::record(self)
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant, Error> {
        write!(self.w, "{variant}")?;
        Logger::record(self)
    }
}

pub(crate) struct Compound<'a, W: Write> {
    log: &'a mut Logger<W>,
    first: bool,
    close: Option<&'static str>,
}

impl<W: Write> Compound<'_, W> {
    fn sep(&mut self) -> Result<(), Error> {
        if !std::mem::take(&mut self.first) {
            write!(self.log.w, ", ")?;
        }
        Ok(())
    }

    fn element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), Error> {
        self.sep()?;
        value.serialize(&mut *self.log)
    }

    fn key<T: ?Sized + Serialize>(&mut self, key: &T) -> Result<(), Error> {
        if self.close.is_some() {
            self.sep()?;
        }
        key.serialize(&mut *self.log)?;
        Ok(write!(self.log.w, "=")?)
    }

    fn value<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), Error> {
        value.serialize(&mut *self.log)?;
        if self.close.is_none() {
            writeln!(self.log.w)?;
        }
        Ok(())
    }

    fn finish(self) -> Result<(), Error> {
        self.log.depth -= 1;
        if let Some(close) = self.close {
            write!(self.log.w, "{close}")?;
        }
        Ok(())
    }
}

macro_rules! impl_seq {
    ($($ty:ident::$method:ident),+ $(,)?) => {$(
        impl<W: Write> ser::$ty for Compound<'_, W> {
            type Ok = ();
            type Error = Error;

            fn $method<T>(&mut self, value: &T) -> Result<(), Error>
            where
                T: ?Sized + Serialize,
            {
                self.element(value)
            }

            fn end(self) -> Result<(), Error> {
                self.finish()
            }
        }
    )+};
}

impl_seq!(
    SerializeSeq::serialize_element,
    SerializeTuple::serialize_element,
    SerializeTupleStruct::serialize_field,
    SerializeTupleVariant::serialize_field,
);

impl<W: Write> ser::SerializeMap for Compound<'_, W> {
    type Ok = ();
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<(), Error>
    where
        T: ?Sized + Serialize,
    {
        self.key(key)
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<(), Error>
    where
        T: ?Sized + Serialize,
    {
        self.value(value)
    }

    fn end(self) -> Result<(), Error> {
        self.finish()
    }
}

macro_rules! impl_record {
    ($($ty:ident),+ $(,)?) => {$(
        impl<W: Write> ser::$ty for Compound<'_, W> {
            type Ok = ();
            type Error = Error;

            fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<(), Error>
            where
                T: ?Sized + Serialize,
            {
                self.key(key)?;
                self.value(value)
            }

            fn end(self) -> Result<(), Error> {
                self.finish()
            }
        }
    )+};
}

impl_record!(SerializeStruct, SerializeStructVariant);
