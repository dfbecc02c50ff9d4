//! Single-line parser for TEAL source text.
//!
//! One source line maps to at most one [`Opcode`]. Comment-only and
//! blank lines are the caller's concern; this module strips trailing
//! `//` comments from instruction lines, recognizes opcodes with their
//! immediates and resolves transaction-field tokens.

use core::fmt;

use crate::field::{
    AcctParamsField, AppParamsField, AssetHoldingField, AssetParamsField, GlobalField, OnComplete,
    TransactionField, TxType,
};
use crate::opcode::Opcode;

/// Failure to parse a single source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError(String);

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ParseError {}

/// Parse a TEAL integer literal.
///
/// Three formats are accepted: hexadecimal with a `0x` prefix, octal
/// with a leading `0`, and decimal. The bare string `"0"` is decimal
/// zero.
pub fn parse_int(x: &str) -> Result<u64, ParseError> {
    let parsed = if let Some(hex) = x.strip_prefix("0x") {
        u64::from_str_radix(hex, 16)
    } else if x.starts_with('0') && x.len() > 1 {
        u64::from_str_radix(x, 8)
    } else {
        x.parse()
    };
    parsed.map_err(|_| ParseError(format!("invalid integer literal: {x:?}")))
}

fn parse_signed_int(x: &str) -> Result<i64, ParseError> {
    if let Some(rest) = x.strip_prefix('-') {
        let magnitude = parse_int(rest)?;
        i64::try_from(magnitude)
            .map(|m| -m)
            .map_err(|_| ParseError(format!("integer literal out of range: {x:?}")))
    } else {
        let magnitude = parse_int(x)?;
        i64::try_from(magnitude)
            .map_err(|_| ParseError(format!("integer literal out of range: {x:?}")))
    }
}

/// The array transaction fields and how their index immediate is cut
/// out of the field token.
const ARRAY_FIELD_PREFIXES: [&str; 5] = [
    "Accounts",
    "ApplicationArgs",
    "Applications",
    "Assets",
    "Logs",
];

/// Parse a transaction-field token.
///
/// `use_stack` is set when the opcode form takes the array index from
/// the stack (`txnas` rather than `txna`); the sentinel `-1` is stored
/// in that case.
pub fn parse_transaction_field(
    token: &str,
    use_stack: bool,
) -> Result<TransactionField, ParseError> {
    use TransactionField::*;

    for prefix in ARRAY_FIELD_PREFIXES {
        if token.starts_with(prefix) {
            let index = if use_stack {
                -1
            } else {
                let immediate = token.get(prefix.len() + 1..).unwrap_or("");
                parse_int(immediate.trim())? as i64
            };
            return Ok(match prefix {
                "Accounts" => Accounts(index),
                "ApplicationArgs" => ApplicationArgs(index),
                "Applications" => Applications(index),
                "Assets" => Assets(index),
                _ => Logs(index),
            });
        }
    }

    let token = token.replace(' ', "");
    let field = match token.as_str() {
        "Sender" => Sender,
        "Fee" => Fee,
        "FirstValid" => FirstValid,
        "FirstValidTime" => FirstValidTime,
        "LastValid" => LastValid,
        "Note" => Note,
        "Lease" => Lease,
        "Receiver" => Receiver,
        "Amount" => Amount,
        "CloseRemainderTo" => CloseRemainderTo,
        "VotePK" => VotePK,
        "SelectionPK" => SelectionPK,
        "VoteFirst" => VoteFirst,
        "VoteLast" => VoteLast,
        "VoteKeyDilution" => VoteKeyDilution,
        "Type" => Type,
        "TypeEnum" => TypeEnum,
        "XferAsset" => XferAsset,
        "AssetAmount" => AssetAmount,
        "AssetSender" => AssetSender,
        "AssetReceiver" => AssetReceiver,
        "AssetCloseTo" => AssetCloseTo,
        "GroupIndex" => GroupIndex,
        "TxID" => TxID,
        "ApplicationID" => ApplicationID,
        "OnCompletion" => OnCompletion,
        "NumAppArgs" => NumAppArgs,
        "NumAccounts" => NumAccounts,
        "ApprovalProgram" => ApprovalProgram,
        "ClearStateProgram" => ClearStateProgram,
        "RekeyTo" => RekeyTo,
        "ConfigAsset" => ConfigAsset,
        "ConfigAssetTotal" => ConfigAssetTotal,
        "ConfigAssetDecimals" => ConfigAssetDecimals,
        "ConfigAssetDefaultFrozen" => ConfigAssetDefaultFrozen,
        "ConfigAssetUnitName" => ConfigAssetUnitName,
        "ConfigAssetName" => ConfigAssetName,
        "ConfigAssetURL" => ConfigAssetURL,
        "ConfigAssetMetadataHash" => ConfigAssetMetadataHash,
        "ConfigAssetManager" => ConfigAssetManager,
        "ConfigAssetReserve" => ConfigAssetReserve,
        "ConfigAssetFreeze" => ConfigAssetFreeze,
        "ConfigAssetClawback" => ConfigAssetClawback,
        "FreezeAsset" => FreezeAsset,
        "FreezeAssetAccount" => FreezeAssetAccount,
        "FreezeAssetFrozen" => FreezeAssetFrozen,
        "NumAssets" => NumAssets,
        "NumApplications" => NumApplications,
        "GlobalNumUint" => GlobalNumUint,
        "GlobalNumByteSlice" => GlobalNumByteSlice,
        "LocalNumUint" => LocalNumUint,
        "LocalNumByteSlice" => LocalNumByteSlice,
        "ExtraProgramPages" => ExtraProgramPages,
        "Nonparticipation" => Nonparticipation,
        "NumLogs" => NumLogs,
        "CreatedAssetID" => CreatedAssetID,
        "CreatedApplicationID" => CreatedApplicationID,
        "LastLog" => LastLog,
        "StateProofPK" => StateProofPK,
        _ => return Err(ParseError(format!("unknown transaction field: {token:?}"))),
    };
    Ok(field)
}

fn parse_global_field(token: &str) -> Result<GlobalField, ParseError> {
    use GlobalField::*;
    let field = match token.replace(' ', "").as_str() {
        "MinTxnFee" => MinTxnFee,
        "MinBalance" => MinBalance,
        "MaxTxnLife" => MaxTxnLife,
        "ZeroAddress" => ZeroAddress,
        "GroupSize" => GroupSize,
        "LogicSigVersion" => LogicSigVersion,
        "Round" => Round,
        "LatestTimestamp" => LatestTimestamp,
        "CurrentApplicationID" => CurrentApplicationID,
        "CreatorAddress" => CreatorAddress,
        "CurrentApplicationAddress" => CurrentApplicationAddress,
        "GroupID" => GroupID,
        "OpcodeBudget" => OpcodeBudget,
        "CallerApplicationID" => CallerApplicationID,
        "CallerApplicationAddress" => CallerApplicationAddress,
        other => return Err(ParseError(format!("unknown global field: {other:?}"))),
    };
    Ok(field)
}

fn parse_asset_holding_field(token: &str) -> Result<AssetHoldingField, ParseError> {
    match token {
        "AssetBalance" => Ok(AssetHoldingField::AssetBalance),
        "AssetFrozen" => Ok(AssetHoldingField::AssetFrozen),
        other => Err(ParseError(format!("unknown asset holding field: {other:?}"))),
    }
}

fn parse_asset_params_field(token: &str) -> Result<AssetParamsField, ParseError> {
    use AssetParamsField::*;
    let field = match token {
        "AssetTotal" => AssetTotal,
        "AssetDecimals" => AssetDecimals,
        "AssetDefaultFrozen" => AssetDefaultFrozen,
        "AssetUnitName" => AssetUnitName,
        "AssetName" => AssetName,
        "AssetURL" => AssetURL,
        "AssetMetadataHash" => AssetMetadataHash,
        "AssetManager" => AssetManager,
        "AssetReserve" => AssetReserve,
        "AssetFreeze" => AssetFreeze,
        "AssetClawback" => AssetClawback,
        "AssetCreator" => AssetCreator,
        other => return Err(ParseError(format!("unknown asset params field: {other:?}"))),
    };
    Ok(field)
}

fn parse_app_params_field(token: &str) -> Result<AppParamsField, ParseError> {
    use AppParamsField::*;
    let field = match token {
        "AppApprovalProgram" => AppApprovalProgram,
        "AppClearStateProgram" => AppClearStateProgram,
        "AppGlobalNumUint" => AppGlobalNumUint,
        "AppGlobalNumByteSlice" => AppGlobalNumByteSlice,
        "AppLocalNumUint" => AppLocalNumUint,
        "AppLocalNumByteSlice" => AppLocalNumByteSlice,
        "AppExtraProgramPages" => AppExtraProgramPages,
        "AppCreator" => AppCreator,
        "AppAddress" => AppAddress,
        other => return Err(ParseError(format!("unknown app params field: {other:?}"))),
    };
    Ok(field)
}

fn parse_acct_params_field(token: &str) -> Result<AcctParamsField, ParseError> {
    use AcctParamsField::*;
    let field = match token {
        "AcctBalance" => AcctBalance,
        "AcctMinBalance" => AcctMinBalance,
        "AcctAuthAddr" => AcctAuthAddr,
        other => return Err(ParseError(format!("unknown acct params field: {other:?}"))),
    };
    Ok(field)
}

/// Strip a trailing `//` comment, ignoring `//` inside string literals.
fn strip_line_comment(line: &str) -> &str {
    let bytes = line.as_bytes();
    let mut in_string = false;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'"' => in_string = !in_string,
            b'\\' if in_string => i += 1,
            b'/' if !in_string && i + 1 < bytes.len() && bytes[i + 1] == b'/' => {
                return &line[..i];
            }
            _ => {}
        }
        i += 1;
    }
    line
}

/// Immediate value of the `int` pseudo opcode: a named constant or an
/// integer literal.
fn parse_int_immediate(token: &str) -> Result<u64, ParseError> {
    if let Some(oc) = OnComplete::from_name(token) {
        return Ok(oc.value());
    }
    if let Some(tt) = TxType::from_name(token) {
        return Ok(tt.value());
    }
    parse_int(token)
}

fn single_immediate(rest: &[&str], opcode: &str) -> Result<u64, ParseError> {
    match rest {
        [imm] => parse_int(imm),
        _ => Err(ParseError(format!("{opcode} expects one immediate"))),
    }
}

/// Parse one line of TEAL source.
///
/// Returns `None` for blank lines. Comment-only lines are expected to
/// be filtered by the caller, which buffers their text; a line that
/// reduces to nothing once its trailing comment is stripped also
/// yields `None`.
pub fn parse_line(line: &str) -> Result<Option<Opcode>, ParseError> {
    let line = strip_line_comment(line).trim();
    if line.is_empty() {
        return Ok(None);
    }

    if let Some(rest) = line.strip_prefix("#pragma") {
        let tokens: Vec<&str> = rest.split_whitespace().collect();
        return match tokens.as_slice() {
            ["version", v] => Ok(Some(Opcode::Pragma(parse_int(v)?))),
            _ => Err(ParseError(format!("unsupported pragma: {line:?}"))),
        };
    }

    let tokens: Vec<&str> = line.split_whitespace().collect();
    let (op, rest) = tokens.split_first().expect("line is non-empty");

    if let Some(label) = op.strip_suffix(':') {
        if !rest.is_empty() {
            return Err(ParseError(format!("unexpected tokens after label: {line:?}")));
        }
        if label.is_empty() {
            return Err(ParseError("empty label".into()));
        }
        return Ok(Some(Opcode::Label(label.to_string())));
    }

    let remainder = || rest.join(" ");
    let opcode = match *op {
        "err" => Opcode::Err,
        "return" => Opcode::Return,
        "retsub" => Opcode::Retsub,
        "assert" => Opcode::Assert,
        "pop" => Opcode::Pop,
        "dup" => Opcode::Dup,
        "dup2" => Opcode::Dup2,
        "swap" => Opcode::Swap,
        "select" => Opcode::Select,
        "b" => Opcode::B(single_label(rest, "b")?),
        "bz" => Opcode::Bz(single_label(rest, "bz")?),
        "bnz" => Opcode::Bnz(single_label(rest, "bnz")?),
        "callsub" => Opcode::Callsub(single_label(rest, "callsub")?),
        "switch" => Opcode::Switch(rest.iter().map(|s| s.to_string()).collect()),
        "match" => Opcode::Match(rest.iter().map(|s| s.to_string()).collect()),
        "int" => match rest {
            [imm] => Opcode::Int(parse_int_immediate(imm)?),
            _ => return Err(ParseError("int expects one immediate".into())),
        },
        "byte" => Opcode::Byte(remainder()),
        "addr" => Opcode::Addr(remainder()),
        "method" => Opcode::Method(remainder()),
        "pushint" => Opcode::PushInt(single_immediate(rest, "pushint")?),
        "pushbytes" => Opcode::PushBytes(remainder()),
        "intcblock" => Opcode::IntcBlock(
            rest.iter().map(|c| parse_int(c)).collect::<Result<_, _>>()?,
        ),
        "intc" => Opcode::Intc(single_immediate(rest, "intc")?),
        "intc_0" => Opcode::Intc0,
        "intc_1" => Opcode::Intc1,
        "intc_2" => Opcode::Intc2,
        "intc_3" => Opcode::Intc3,
        "bytecblock" => Opcode::BytecBlock(rest.iter().map(|s| s.to_string()).collect()),
        "bytec" => Opcode::Bytec(single_immediate(rest, "bytec")?),
        "bytec_0" => Opcode::Bytec0,
        "bytec_1" => Opcode::Bytec1,
        "bytec_2" => Opcode::Bytec2,
        "bytec_3" => Opcode::Bytec3,
        "txn" => Opcode::Txn(parse_transaction_field(&remainder(), false)?),
        "txna" => Opcode::Txna(parse_transaction_field(&remainder(), false)?),
        "txnas" => Opcode::Txnas(parse_transaction_field(&remainder(), true)?),
        "gtxn" | "gtxna" | "gtxnas" => {
            let (idx, field) = rest
                .split_first()
                .ok_or_else(|| ParseError(format!("{op} expects a group position")))?;
            let idx = parse_int(idx)?;
            let field_token = field.join(" ");
            match *op {
                "gtxn" => Opcode::Gtxn(idx, parse_transaction_field(&field_token, false)?),
                "gtxna" => Opcode::Gtxna(idx, parse_transaction_field(&field_token, false)?),
                _ => Opcode::Gtxnas(idx, parse_transaction_field(&field_token, true)?),
            }
        }
        "gtxns" => Opcode::Gtxns(parse_transaction_field(&remainder(), false)?),
        "gtxnsa" => Opcode::Gtxnsa(parse_transaction_field(&remainder(), false)?),
        "gtxnsas" => Opcode::Gtxnsas(parse_transaction_field(&remainder(), true)?),
        "itxn" => Opcode::Itxn(parse_transaction_field(&remainder(), false)?),
        "itxna" => Opcode::Itxna(parse_transaction_field(&remainder(), false)?),
        "itxn_begin" => Opcode::ItxnBegin,
        "itxn_field" => Opcode::ItxnField(parse_transaction_field(&remainder(), true)?),
        "itxn_next" => Opcode::ItxnNext,
        "itxn_submit" => Opcode::ItxnSubmit,
        "global" => Opcode::Global(parse_global_field(&remainder())?),
        "+" => Opcode::Add,
        "-" => Opcode::Sub,
        "*" => Opcode::Mul,
        "/" => Opcode::Div,
        "%" => Opcode::Mod,
        "<" => Opcode::Lt,
        ">" => Opcode::Gt,
        "<=" => Opcode::Le,
        ">=" => Opcode::Ge,
        "==" => Opcode::Eq,
        "!=" => Opcode::Neq,
        "&&" => Opcode::And,
        "||" => Opcode::Or,
        "!" => Opcode::Not,
        "|" => Opcode::BitOr,
        "&" => Opcode::BitAnd,
        "^" => Opcode::BitXor,
        "~" => Opcode::BitNot,
        "addw" => Opcode::Addw,
        "mulw" => Opcode::Mulw,
        "divmodw" => Opcode::Divmodw,
        "divw" => Opcode::Divw,
        "shl" => Opcode::Shl,
        "shr" => Opcode::Shr,
        "sqrt" => Opcode::Sqrt,
        "exp" => Opcode::Exp,
        "expw" => Opcode::Expw,
        "bitlen" => Opcode::Bitlen,
        "len" => Opcode::Len,
        "itob" => Opcode::Itob,
        "btoi" => Opcode::Btoi,
        "concat" => Opcode::Concat,
        "substring" => {
            let (s, e) = two_immediates(rest, "substring")?;
            Opcode::Substring(s, e)
        }
        "substring3" => Opcode::Substring3,
        "extract" => {
            let (s, l) = two_immediates(rest, "extract")?;
            Opcode::Extract(s, l)
        }
        "extract3" => Opcode::Extract3,
        "sha256" => Opcode::Sha256,
        "keccak256" => Opcode::Keccak256,
        "sha512_256" => Opcode::Sha512_256,
        "ed25519verify" => Opcode::Ed25519Verify,
        "load" => Opcode::Load(single_immediate(rest, "load")?),
        "store" => Opcode::Store(single_immediate(rest, "store")?),
        "loads" => Opcode::Loads,
        "stores" => Opcode::Stores,
        "gload" => {
            let (t, s) = two_immediates(rest, "gload")?;
            Opcode::Gload(t, s)
        }
        "gloads" => Opcode::Gloads(single_immediate(rest, "gloads")?),
        "gaid" => Opcode::Gaid(single_immediate(rest, "gaid")?),
        "gaids" => Opcode::Gaids,
        "app_opted_in" => Opcode::AppOptedIn,
        "app_local_get" => Opcode::AppLocalGet,
        "app_local_get_ex" => Opcode::AppLocalGetEx,
        "app_global_get" => Opcode::AppGlobalGet,
        "app_global_get_ex" => Opcode::AppGlobalGetEx,
        "app_local_put" => Opcode::AppLocalPut,
        "app_global_put" => Opcode::AppGlobalPut,
        "app_local_del" => Opcode::AppLocalDel,
        "app_global_del" => Opcode::AppGlobalDel,
        "balance" => Opcode::Balance,
        "min_balance" => Opcode::MinBalance,
        "asset_holding_get" => Opcode::AssetHoldingGet(parse_asset_holding_field(&remainder())?),
        "asset_params_get" => Opcode::AssetParamsGet(parse_asset_params_field(&remainder())?),
        "app_params_get" => Opcode::AppParamsGet(parse_app_params_field(&remainder())?),
        "acct_params_get" => Opcode::AcctParamsGet(parse_acct_params_field(&remainder())?),
        "log" => Opcode::Log,
        "arg" => Opcode::Arg(single_immediate(rest, "arg")?),
        "arg_0" => Opcode::Arg(0),
        "arg_1" => Opcode::Arg(1),
        "arg_2" => Opcode::Arg(2),
        "arg_3" => Opcode::Arg(3),
        "args" => Opcode::Args,
        "dig" => Opcode::Dig(single_immediate(rest, "dig")?),
        "cover" => Opcode::Cover(single_immediate(rest, "cover")?),
        "uncover" => Opcode::Uncover(single_immediate(rest, "uncover")?),
        "proto" => {
            let (a, r) = two_immediates(rest, "proto")?;
            Opcode::Proto(a, r)
        }
        "frame_dig" => match rest {
            [imm] => Opcode::FrameDig(parse_signed_int(imm)?),
            _ => return Err(ParseError("frame_dig expects one immediate".into())),
        },
        "frame_bury" => match rest {
            [imm] => Opcode::FrameBury(parse_signed_int(imm)?),
            _ => return Err(ParseError("frame_bury expects one immediate".into())),
        },
        other => return Err(ParseError(format!("unknown opcode: {other:?}"))),
    };
    Ok(Some(opcode))
}

fn single_label(rest: &[&str], opcode: &str) -> Result<String, ParseError> {
    match rest {
        [label] => Ok(label.to_string()),
        _ => Err(ParseError(format!("{opcode} expects one label"))),
    }
}

fn two_immediates(rest: &[&str], opcode: &str) -> Result<(u64, u64), ParseError> {
    match rest {
        [a, b] => Ok((parse_int(a)?, parse_int(b)?)),
        _ => Err(ParseError(format!("{opcode} expects two immediates"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("0x1A", 26)]
    #[case("017", 15)]
    #[case("0", 0)]
    #[case("42", 42)]
    #[case("0x0", 0)]
    fn integer_literal_formats(#[case] text: &str, #[case] value: u64) {
        assert_eq!(parse_int(text).unwrap(), value);
    }

    #[test]
    fn rejects_malformed_integers() {
        assert!(parse_int("").is_err());
        assert!(parse_int("0x").is_err());
        assert!(parse_int("08").is_err());
        assert!(parse_int("ten").is_err());
    }

    #[rstest]
    #[case("int 1", Opcode::Int(1))]
    #[case("int UpdateApplication", Opcode::Int(4))]
    #[case("int pay", Opcode::Int(1))]
    #[case("bnz main_l2", Opcode::Bnz("main_l2".into()))]
    #[case("txn Sender", Opcode::Txn(TransactionField::Sender))]
    #[case("txna Accounts 1", Opcode::Txna(TransactionField::Accounts(1)))]
    #[case("txnas Accounts", Opcode::Txnas(TransactionField::Accounts(-1)))]
    #[case("gtxn 0 Fee", Opcode::Gtxn(0, TransactionField::Fee))]
    #[case("global GroupSize", Opcode::Global(GlobalField::GroupSize))]
    #[case("frame_dig -1", Opcode::FrameDig(-1))]
    #[case("main:", Opcode::Label("main".into()))]
    fn parses_representative_lines(#[case] line: &str, #[case] expected: Opcode) {
        assert_eq!(parse_line(line).unwrap(), Some(expected));
    }

    #[test]
    fn pragma_version() {
        assert_eq!(parse_line("#pragma version 7").unwrap(), Some(Opcode::Pragma(7)));
        assert!(parse_line("#pragma mode logicsig").is_err());
    }

    #[test]
    fn blank_and_comment_stripped_lines_produce_nothing() {
        assert_eq!(parse_line("").unwrap(), None);
        assert_eq!(parse_line("   ").unwrap(), None);
        assert_eq!(parse_line("   // only a comment").unwrap(), None);
    }

    #[test]
    fn trailing_comments_are_stripped() {
        assert_eq!(
            parse_line("int 1 // approve").unwrap(),
            Some(Opcode::Int(1))
        );
        // a `//` inside a byte string is not a comment
        assert_eq!(
            parse_line(r#"byte "a//b""#).unwrap(),
            Some(Opcode::Byte(r#""a//b""#.into()))
        );
    }

    #[test]
    fn method_signature_keeps_quotes() {
        let parsed = parse_line(r#"method "add(uint64,uint64)uint64""#).unwrap();
        assert_eq!(
            parsed,
            Some(Opcode::Method(r#""add(uint64,uint64)uint64""#.into()))
        );
    }

    #[test]
    fn array_field_without_index_is_rejected() {
        assert!(parse_line("txn Accounts").is_err());
        assert!(parse_line("txnas Accounts").is_ok());
    }

    #[test]
    fn unknown_tokens_fail() {
        assert!(parse_line("frobnicate").is_err());
        assert!(parse_line("txn NotAField").is_err());
        assert!(parse_line("global NotAGlobal").is_err());
    }
}
