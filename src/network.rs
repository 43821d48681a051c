// Messages are JSON objects framed with a 4-byte little-endian length prefix.

use std::io;

use byteorder::{ByteOrder, LittleEndian};
use serde::Serialize;
use serde::de::DeserializeOwned;


// Large enough for a resync message of a very long game.
pub const MAX_MESSAGE_LEN: u32 = 16 * 1024 * 1024;

fn invalid_data(err: impl std::error::Error + Send + Sync + 'static) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, err)
}

pub fn write_str(writer: &mut impl io::Write, data: &str) -> io::Result<()> {
    let len: u32 = data.len().try_into().map_err(invalid_data)?;
    let mut buf = [0u8; 4];
    LittleEndian::write_u32(&mut buf, len);
    writer.write_all(&buf)?;
    writer.write_all(data.as_bytes())?;
    writer.flush()
}

pub fn read_str(reader: &mut impl io::Read) -> io::Result<String> {
    let mut len_buf = [0u8; 4];
    reader.read_exact(&mut len_buf)?;
    let len = LittleEndian::read_u32(&len_buf);
    if len > MAX_MESSAGE_LEN {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("message of {len} bytes exceeds the limit"),
        ));
    }
    let mut content_buf = vec![0; len as usize];
    reader.read_exact(&mut content_buf)?;
    String::from_utf8(content_buf).map_err(invalid_data)
}

pub fn write_obj(writer: &mut impl io::Write, obj: &impl Serialize) -> io::Result<()> {
    write_str(writer, &serde_json::to_string(obj).map_err(invalid_data)?)
}

pub fn parse_obj<T: DeserializeOwned>(s: &str) -> Result<T, serde_json::Error> {
    serde_json::from_str(s)
}

pub fn read_obj<T: DeserializeOwned>(reader: &mut impl io::Read) -> io::Result<T> {
    parse_obj(&read_str(reader)?).map_err(invalid_data)
}


#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::coord::Location;
    use crate::game::PlayerAction;
    use crate::piece::PieceKind;
    use crate::player::Player;

    #[test]
    fn framed_messages_are_read_in_order() {
        let first = PlayerAction::drop(Player::Two, PieceKind::Pikachu, Location::new(2, 5));
        let second =
            PlayerAction::movement(Player::One, PieceKind::Eevee, Location::new(6, 0), Location::new(5, 0));
        let mut buf = Vec::new();
        write_obj(&mut buf, &first).unwrap();
        write_obj(&mut buf, &second).unwrap();

        let mut reader = Cursor::new(buf);
        assert_eq!(read_obj::<PlayerAction>(&mut reader).unwrap(), first);
        assert_eq!(read_obj::<PlayerAction>(&mut reader).unwrap(), second);
        let err = read_obj::<PlayerAction>(&mut reader).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn malformed_payload_is_invalid_data() {
        let mut buf = Vec::new();
        write_str(&mut buf, "1%p63 2%p13").unwrap();
        let err = read_obj::<PlayerAction>(&mut Cursor::new(buf)).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn oversized_length_is_rejected() {
        let mut buf = vec![0u8; 4];
        LittleEndian::write_u32(&mut buf, MAX_MESSAGE_LEN + 1);
        let err = read_str(&mut Cursor::new(buf)).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }
}
