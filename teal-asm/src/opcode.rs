use core::fmt;

use crate::field::{
    AcctParamsField, AppParamsField, AssetHoldingField, AssetParamsField, GlobalField,
    TransactionField,
};

/// Execution context a contract runs in.
///
/// Some instructions are only valid when the program runs as an
/// application (stateful) or as a logic signature (stateless); the rest
/// are accepted in either context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::EnumIter)]
pub enum ContractType {
    /// Logic-signature program attached to a transaction.
    Stateless,
    /// Application program that may read and write application state.
    Stateful,
    /// Valid in both execution modes.
    Any,
}

impl fmt::Display for ContractType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContractType::Stateless => write!(f, "Signature"),
            ContractType::Stateful => write!(f, "Application"),
            ContractType::Any => write!(f, "Any"),
        }
    }
}

/// Instruction representation for the analyzer.
///
/// One variant per TEAL opcode, immediates carried inline. Pseudo
/// opcodes emitted by the assembler (`int`, `byte`, `addr`, `method`)
/// are kept as-is rather than lowered to their constant-block forms.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Opcode {
    // Control flow

    /// Branch target. The trailing `:` of the source form is stripped.
    Label(String),
    /// `#pragma version N` directive declaring the program version.
    Pragma(u64),
    /// Unconditional branch.
    B(String),
    /// Branch if the top of the stack is zero.
    Bz(String),
    /// Branch if the top of the stack is not zero.
    Bnz(String),
    /// Branch to the N-th label using the top of the stack as N.
    Switch(Vec<String>),
    /// Branch to the label whose preceding stack value equals the top.
    Match(Vec<String>),
    /// Fail immediately.
    Err,
    /// Use the top of the stack as the success value and exit.
    Return,
    /// Call the subroutine starting at the label.
    Callsub(String),
    /// Return from the current subroutine.
    Retsub,
    /// Fail unless the top of the stack is a non-zero integer.
    Assert,

    // Constants

    /// `int N` pseudo opcode pushing an integer constant.
    Int(u64),
    /// `byte ...` pseudo opcode pushing a byte constant; the immediate
    /// is stored verbatim.
    Byte(String),
    /// `addr ...` pseudo opcode pushing an address literal.
    Addr(String),
    /// `method "signature"` pseudo opcode pushing the 4-byte selector
    /// of an ARC-4 method signature. Quotes are kept in the stored
    /// signature.
    Method(String),
    /// Declare the integer constant pool.
    IntcBlock(Vec<u64>),
    /// Push the N-th integer constant.
    Intc(u64),
    /// Push integer constant 0.
    Intc0,
    /// Push integer constant 1.
    Intc1,
    /// Push integer constant 2.
    Intc2,
    /// Push integer constant 3.
    Intc3,
    /// Declare the byte constant pool; immediates stored verbatim.
    BytecBlock(Vec<String>),
    /// Push the N-th byte constant.
    Bytec(u64),
    /// Push byte constant 0.
    Bytec0,
    /// Push byte constant 1.
    Bytec1,
    /// Push byte constant 2.
    Bytec2,
    /// Push byte constant 3.
    Bytec3,
    /// Push an immediate integer without using the constant pool.
    PushInt(u64),
    /// Push an immediate byte string without using the constant pool.
    PushBytes(String),

    // Transaction context

    /// Push a field of the current transaction.
    Txn(TransactionField),
    /// Push an element of an array field of the current transaction.
    Txna(TransactionField),
    /// Like `txna` with the array index taken from the stack.
    Txnas(TransactionField),
    /// Push a field of the transaction at the given group position.
    Gtxn(u64, TransactionField),
    /// Push an array-field element of the transaction at the given
    /// group position.
    Gtxna(u64, TransactionField),
    /// Like `gtxna` with the array index taken from the stack.
    Gtxnas(u64, TransactionField),
    /// Push a field of the group transaction selected by the stack.
    Gtxns(TransactionField),
    /// Push an array-field element of the group transaction selected by
    /// the stack.
    Gtxnsa(TransactionField),
    /// Like `gtxnsa` with both indices taken from the stack.
    Gtxnsas(TransactionField),
    /// Push a field of the last inner transaction.
    Itxn(TransactionField),
    /// Push an array-field element of the last inner transaction.
    Itxna(TransactionField),
    /// Begin constructing an inner transaction.
    ItxnBegin,
    /// Set a field of the inner transaction under construction.
    ItxnField(TransactionField),
    /// Finish the current inner transaction and begin the next one.
    ItxnNext,
    /// Submit the inner transaction group.
    ItxnSubmit,
    /// Push a global parameter.
    Global(GlobalField),

    // Arithmetic and logic

    /// Integer addition; panics on overflow.
    Add,
    /// Integer subtraction; panics on underflow.
    Sub,
    /// Integer multiplication; panics on overflow.
    Mul,
    /// Integer division; panics on division by zero.
    Div,
    /// Integer modulo.
    Mod,
    /// Less-than comparison.
    Lt,
    /// Greater-than comparison.
    Gt,
    /// Less-or-equal comparison.
    Le,
    /// Greater-or-equal comparison.
    Ge,
    /// Equality comparison.
    Eq,
    /// Inequality comparison.
    Neq,
    /// Boolean conjunction.
    And,
    /// Boolean disjunction.
    Or,
    /// Boolean negation.
    Not,
    /// Bitwise or.
    BitOr,
    /// Bitwise and.
    BitAnd,
    /// Bitwise xor.
    BitXor,
    /// Bitwise complement.
    BitNot,
    /// 128-bit addition pushing the high and low words.
    Addw,
    /// 128-bit multiplication pushing the high and low words.
    Mulw,
    /// 128-bit division pushing quotient and remainder pairs.
    Divmodw,
    /// Divide a 128-bit value by a 64-bit value.
    Divw,
    /// Left shift.
    Shl,
    /// Right shift.
    Shr,
    /// Integer square root.
    Sqrt,
    /// Exponentiation; panics on overflow.
    Exp,
    /// 128-bit exponentiation pushing the high and low words.
    Expw,
    /// Highest set bit index plus one.
    Bitlen,

    // Byte arrays

    /// Length of the byte string on top of the stack.
    Len,
    /// Convert an integer to a big-endian byte string.
    Itob,
    /// Convert a big-endian byte string to an integer.
    Btoi,
    /// Concatenate two byte strings.
    Concat,
    /// Substring with immediate start and end positions.
    Substring(u64, u64),
    /// Substring with start and end taken from the stack.
    Substring3,
    /// Extract with immediate start position and length.
    Extract(u64, u64),
    /// Extract with start and length taken from the stack.
    Extract3,

    // Cryptographic

    /// SHA-256 hash of the top of the stack.
    Sha256,
    /// Keccak-256 hash of the top of the stack.
    Keccak256,
    /// SHA-512/256 hash of the top of the stack.
    Sha512_256,
    /// Verify an ed25519 signature over `("ProgData" || program || data)`.
    Ed25519Verify,

    // Scratch space and group access

    /// Push the value of a scratch slot.
    Load(u64),
    /// Store the top of the stack into a scratch slot.
    Store(u64),
    /// Like `load` with the slot taken from the stack.
    Loads,
    /// Like `store` with the slot taken from the stack.
    Stores,
    /// Push a scratch slot of an earlier transaction in the group.
    Gload(u64, u64),
    /// Like `gload` with the group position taken from the stack.
    Gloads(u64),
    /// Push the ID created by an earlier transaction in the group.
    Gaid(u64),
    /// Like `gaid` with the group position taken from the stack.
    Gaids,

    // Application state

    /// Check whether an account has opted in to an application.
    AppOptedIn,
    /// Read a key from an account's local state.
    AppLocalGet,
    /// Read a key from a specific application's local state.
    AppLocalGetEx,
    /// Read a key from the global state.
    AppGlobalGet,
    /// Read a key from a specific application's global state.
    AppGlobalGetEx,
    /// Write a key to an account's local state.
    AppLocalPut,
    /// Write a key to the global state.
    AppGlobalPut,
    /// Delete a key from an account's local state.
    AppLocalDel,
    /// Delete a key from the global state.
    AppGlobalDel,
    /// Push the balance of an account in microalgos.
    Balance,
    /// Push the minimum balance of an account in microalgos.
    MinBalance,
    /// Read an asset-holding field of an account.
    AssetHoldingGet(AssetHoldingField),
    /// Read a parameter field of an asset.
    AssetParamsGet(AssetParamsField),
    /// Read a parameter field of an application.
    AppParamsGet(AppParamsField),
    /// Read a parameter field of an account.
    AcctParamsGet(AcctParamsField),
    /// Append the top of the stack to the transaction log.
    Log,

    // Signature arguments

    /// Push the N-th logic-signature argument.
    Arg(u64),
    /// Like `arg` with the index taken from the stack.
    Args,

    // Stack manipulation

    /// Discard the top of the stack.
    Pop,
    /// Duplicate the top of the stack.
    Dup,
    /// Duplicate the two top values of the stack.
    Dup2,
    /// Push a copy of the N-th value from the top.
    Dig(u64),
    /// Exchange the two top values of the stack.
    Swap,
    /// Select between the second and third stack values by the top.
    Select,
    /// Remove the top of the stack and insert it N values down.
    Cover(u64),
    /// Remove the N-th value from the top and push it.
    Uncover(u64),
    /// Declare the argument and return counts of a subroutine.
    Proto(u64, u64),
    /// Push a copy of a value relative to the frame pointer.
    FrameDig(i64),
    /// Replace a value relative to the frame pointer.
    FrameBury(i64),
}

impl Opcode {
    /// TEAL version that introduced the instruction.
    pub fn version(&self) -> u64 {
        use Opcode::*;
        match self {
            Label(_) | Pragma(_) | Bnz(_) | Err | Int(_) | Byte(_) | Addr(_) | IntcBlock(_)
            | Intc(_) | Intc0 | Intc1 | Intc2 | Intc3 | BytecBlock(_) | Bytec(_) | Bytec0
            | Bytec1 | Bytec2 | Bytec3 | Txn(_) | Gtxn(..) | Global(_) | Add | Sub | Mul | Div
            | Mod | Lt | Gt | Le | Ge | Eq | Neq | And | Or | Not | BitOr | BitAnd | BitXor
            | BitNot | Mulw | Len | Itob | Btoi | Sha256 | Keccak256 | Sha512_256
            | Ed25519Verify | Load(_) | Store(_) | Arg(_) | Pop | Dup => 1,
            B(_) | Bz(_) | Return | Method(_) | Txna(_) | Gtxna(..) | Addw | Concat
            | Substring(..) | Substring3 | AppOptedIn | AppLocalGet | AppLocalGetEx
            | AppGlobalGet | AppGlobalGetEx | AppLocalPut | AppGlobalPut | AppLocalDel
            | AppGlobalDel | Balance | AssetHoldingGet(_) | AssetParamsGet(_) | Dup2 => 2,
            Assert | PushInt(_) | PushBytes(_) | Gtxns(_) | Gtxnsa(_) | MinBalance | Dig(_)
            | Swap | Select => 3,
            Callsub(_) | Retsub | Divmodw | Shl | Shr | Sqrt | Exp | Expw | Bitlen | Gload(..)
            | Gloads(_) | Gaid(_) | Gaids => 4,
            Txnas(_) | Gtxnas(..) | Gtxnsas(_) | Itxn(_) | Itxna(_) | ItxnBegin | ItxnField(_)
            | ItxnSubmit | Extract(..) | Extract3 | Loads | Stores | AppParamsGet(_) | Log
            | Args | Cover(_) | Uncover(_) => 5,
            ItxnNext | Divw | AcctParamsGet(_) => 6,
            Switch(_) | Match(_) | Proto(..) | FrameDig(_) | FrameBury(_) => 8,
        }
    }

    /// Execution mode the instruction is restricted to.
    pub fn mode(&self) -> ContractType {
        use Opcode::*;
        match self {
            Arg(_) | Args => ContractType::Stateless,
            Itxn(_) | Itxna(_) | ItxnBegin | ItxnField(_) | ItxnNext | ItxnSubmit | Gload(..)
            | Gloads(_) | Gaid(_) | Gaids | AppOptedIn | AppLocalGet | AppLocalGetEx
            | AppGlobalGet | AppGlobalGetEx | AppLocalPut | AppGlobalPut | AppLocalDel
            | AppGlobalDel | Balance | MinBalance | AssetHoldingGet(_) | AssetParamsGet(_)
            | AppParamsGet(_) | AcctParamsGet(_) | Log => ContractType::Stateful,
            _ => ContractType::Any,
        }
    }

    /// Static execution-cost estimate of the instruction.
    pub fn cost(&self) -> u64 {
        use Opcode::*;
        match self {
            Sha256 => 35,
            Keccak256 => 130,
            Sha512_256 => 45,
            Ed25519Verify => 1900,
            Sqrt => 4,
            Divmodw => 20,
            Expw => 10,
            Label(_) | Pragma(_) => 0,
            _ => 1,
        }
    }

    /// Values popped from and pushed onto the stack, `(pops, pushes)`.
    ///
    /// Stack-shuffling opcodes (`dup`, `dig`, `cover`, ...) report their
    /// nominal arity; consumers that track value identity special-case
    /// them.
    pub fn stack_arity(&self) -> (usize, usize) {
        use Opcode::*;
        match self {
            Label(_) | Pragma(_) | B(_) | Err | Callsub(_) | Retsub | IntcBlock(_)
            | BytecBlock(_) | ItxnBegin | ItxnNext | ItxnSubmit | Proto(..) => (0, 0),
            Bz(_) | Bnz(_) | Switch(_) | Return | Assert | Pop | Store(_) | Log | FrameBury(_)
            | ItxnField(_) | AppGlobalDel => (1, 0),
            Match(labels) => (labels.len() + 1, 0),
            Int(_) | Byte(_) | Addr(_) | Method(_) | Intc(_) | Intc0 | Intc1 | Intc2 | Intc3
            | Bytec(_) | Bytec0 | Bytec1 | Bytec2 | Bytec3 | PushInt(_) | PushBytes(_)
            | Txn(_) | Txna(_) | Gtxn(..) | Gtxna(..) | Itxn(_) | Itxna(_) | Global(_)
            | Load(_) | Gload(..) | Gaid(_) | Arg(_) | FrameDig(_) => (0, 1),
            Txnas(_) | Gtxnas(..) | Gtxns(_) | Gtxnsa(_) | Loads | Gloads(_) | Gaids | Not
            | BitNot | Sqrt | Bitlen | Len | Itob | Btoi | Substring(..) | Extract(..)
            | Sha256 | Keccak256 | Sha512_256 | Balance | MinBalance | Args
            | AppGlobalGet => (1, 1),
            Gtxnsas(_) | Add | Sub | Mul | Div | Mod | Lt | Gt | Le | Ge | Eq | Neq | And
            | Or | BitOr | BitAnd | BitXor | Shl | Shr | Exp | Concat | AppOptedIn
            | AppLocalGet => (2, 1),
            Addw | Mulw | Expw => (2, 2),
            Divmodw => (4, 4),
            Divw | Substring3 | Extract3 | Select | Ed25519Verify => (3, 1),
            AppLocalGetEx => (3, 2),
            AppGlobalGetEx | AssetHoldingGet(_) => (2, 2),
            AssetParamsGet(_) | AppParamsGet(_) | AcctParamsGet(_) => (1, 2),
            AppLocalPut => (3, 0),
            AppGlobalPut | AppLocalDel | Stores => (2, 0),
            Dup => (1, 2),
            Dup2 => (2, 4),
            Swap => (2, 2),
            Dig(n) => (*n as usize + 1, *n as usize + 2),
            Cover(n) | Uncover(n) => (*n as usize + 1, *n as usize + 1),
        }
    }

    /// Display name and minimum version of the contained context field,
    /// if the instruction carries one.
    pub fn field_version(&self) -> Option<(String, u64)> {
        use Opcode::*;
        match self {
            Txn(f) | Txna(f) | Txnas(f) | Gtxn(_, f) | Gtxna(_, f) | Gtxnas(_, f) | Gtxns(f)
            | Gtxnsa(f) | Gtxnsas(f) | Itxn(f) | Itxna(f) | ItxnField(f) => {
                Some((f.to_string(), f.version()))
            }
            Global(f) => Some((f.to_string(), f.version())),
            AssetHoldingGet(f) => Some((f.to_string(), f.version())),
            AssetParamsGet(f) => Some((f.to_string(), f.version())),
            AppParamsGet(f) => Some((f.to_string(), f.version())),
            AcctParamsGet(f) => Some((f.to_string(), f.version())),
            _ => None,
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Opcode::*;
        match self {
            Label(l) => write!(f, "{l}:"),
            Pragma(v) => write!(f, "#pragma version {v}"),
            B(l) => write!(f, "b {l}"),
            Bz(l) => write!(f, "bz {l}"),
            Bnz(l) => write!(f, "bnz {l}"),
            Switch(ls) => write!(f, "switch {}", ls.join(" ")),
            Match(ls) => write!(f, "match {}", ls.join(" ")),
            Err => write!(f, "err"),
            Return => write!(f, "return"),
            Callsub(l) => write!(f, "callsub {l}"),
            Retsub => write!(f, "retsub"),
            Assert => write!(f, "assert"),
            Int(n) => write!(f, "int {n}"),
            Byte(b) => write!(f, "byte {b}"),
            Addr(a) => write!(f, "addr {a}"),
            Method(m) => write!(f, "method {m}"),
            IntcBlock(cs) => {
                write!(f, "intcblock")?;
                for c in cs {
                    write!(f, " {c}")?;
                }
                Ok(())
            }
            Intc(n) => write!(f, "intc {n}"),
            Intc0 => write!(f, "intc_0"),
            Intc1 => write!(f, "intc_1"),
            Intc2 => write!(f, "intc_2"),
            Intc3 => write!(f, "intc_3"),
            BytecBlock(cs) => {
                write!(f, "bytecblock")?;
                for c in cs {
                    write!(f, " {c}")?;
                }
                Ok(())
            }
            Bytec(n) => write!(f, "bytec {n}"),
            Bytec0 => write!(f, "bytec_0"),
            Bytec1 => write!(f, "bytec_1"),
            Bytec2 => write!(f, "bytec_2"),
            Bytec3 => write!(f, "bytec_3"),
            PushInt(n) => write!(f, "pushint {n}"),
            PushBytes(b) => write!(f, "pushbytes {b}"),
            Txn(fd) => write!(f, "txn {fd}"),
            Txna(fd) => write!(f, "txna {fd}"),
            Txnas(fd) => write!(f, "txnas {fd}"),
            Gtxn(i, fd) => write!(f, "gtxn {i} {fd}"),
            Gtxna(i, fd) => write!(f, "gtxna {i} {fd}"),
            Gtxnas(i, fd) => write!(f, "gtxnas {i} {fd}"),
            Gtxns(fd) => write!(f, "gtxns {fd}"),
            Gtxnsa(fd) => write!(f, "gtxnsa {fd}"),
            Gtxnsas(fd) => write!(f, "gtxnsas {fd}"),
            Itxn(fd) => write!(f, "itxn {fd}"),
            Itxna(fd) => write!(f, "itxna {fd}"),
            ItxnBegin => write!(f, "itxn_begin"),
            ItxnField(fd) => write!(f, "itxn_field {fd}"),
            ItxnNext => write!(f, "itxn_next"),
            ItxnSubmit => write!(f, "itxn_submit"),
            Global(g) => write!(f, "global {g}"),
            Add => write!(f, "+"),
            Sub => write!(f, "-"),
            Mul => write!(f, "*"),
            Div => write!(f, "/"),
            Mod => write!(f, "%"),
            Lt => write!(f, "<"),
            Gt => write!(f, ">"),
            Le => write!(f, "<="),
            Ge => write!(f, ">="),
            Eq => write!(f, "=="),
            Neq => write!(f, "!="),
            And => write!(f, "&&"),
            Or => write!(f, "||"),
            Not => write!(f, "!"),
            BitOr => write!(f, "|"),
            BitAnd => write!(f, "&"),
            BitXor => write!(f, "^"),
            BitNot => write!(f, "~"),
            Addw => write!(f, "addw"),
            Mulw => write!(f, "mulw"),
            Divmodw => write!(f, "divmodw"),
            Divw => write!(f, "divw"),
            Shl => write!(f, "shl"),
            Shr => write!(f, "shr"),
            Sqrt => write!(f, "sqrt"),
            Exp => write!(f, "exp"),
            Expw => write!(f, "expw"),
            Bitlen => write!(f, "bitlen"),
            Len => write!(f, "len"),
            Itob => write!(f, "itob"),
            Btoi => write!(f, "btoi"),
            Concat => write!(f, "concat"),
            Substring(s, e) => write!(f, "substring {s} {e}"),
            Substring3 => write!(f, "substring3"),
            Extract(s, l) => write!(f, "extract {s} {l}"),
            Extract3 => write!(f, "extract3"),
            Sha256 => write!(f, "sha256"),
            Keccak256 => write!(f, "keccak256"),
            Sha512_256 => write!(f, "sha512_256"),
            Ed25519Verify => write!(f, "ed25519verify"),
            Load(n) => write!(f, "load {n}"),
            Store(n) => write!(f, "store {n}"),
            Loads => write!(f, "loads"),
            Stores => write!(f, "stores"),
            Gload(t, s) => write!(f, "gload {t} {s}"),
            Gloads(s) => write!(f, "gloads {s}"),
            Gaid(t) => write!(f, "gaid {t}"),
            Gaids => write!(f, "gaids"),
            AppOptedIn => write!(f, "app_opted_in"),
            AppLocalGet => write!(f, "app_local_get"),
            AppLocalGetEx => write!(f, "app_local_get_ex"),
            AppGlobalGet => write!(f, "app_global_get"),
            AppGlobalGetEx => write!(f, "app_global_get_ex"),
            AppLocalPut => write!(f, "app_local_put"),
            AppGlobalPut => write!(f, "app_global_put"),
            AppLocalDel => write!(f, "app_local_del"),
            AppGlobalDel => write!(f, "app_global_del"),
            Balance => write!(f, "balance"),
            MinBalance => write!(f, "min_balance"),
            AssetHoldingGet(fd) => write!(f, "asset_holding_get {fd}"),
            AssetParamsGet(fd) => write!(f, "asset_params_get {fd}"),
            AppParamsGet(fd) => write!(f, "app_params_get {fd}"),
            AcctParamsGet(fd) => write!(f, "acct_params_get {fd}"),
            Log => write!(f, "log"),
            Arg(n) => write!(f, "arg {n}"),
            Args => write!(f, "args"),
            Pop => write!(f, "pop"),
            Dup => write!(f, "dup"),
            Dup2 => write!(f, "dup2"),
            Dig(n) => write!(f, "dig {n}"),
            Swap => write!(f, "swap"),
            Select => write!(f, "select"),
            Cover(n) => write!(f, "cover {n}"),
            Uncover(n) => write!(f, "uncover {n}"),
            Proto(a, r) => write!(f, "proto {a} {r}"),
            FrameDig(n) => write!(f, "frame_dig {n}"),
            FrameBury(n) => write!(f, "frame_bury {n}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::TransactionField;

    #[test]
    fn version_and_mode_of_representative_opcodes() {
        assert_eq!(Opcode::Err.version(), 1);
        assert_eq!(Opcode::Return.version(), 2);
        assert_eq!(Opcode::Assert.version(), 3);
        assert_eq!(Opcode::Callsub("s".into()).version(), 4);
        assert_eq!(Opcode::Log.version(), 5);
        assert_eq!(Opcode::Switch(vec![]).version(), 8);

        assert_eq!(Opcode::AppGlobalGet.mode(), ContractType::Stateful);
        assert_eq!(Opcode::Arg(0).mode(), ContractType::Stateless);
        assert_eq!(Opcode::Add.mode(), ContractType::Any);
    }

    #[test]
    fn match_pops_one_more_than_its_labels() {
        let op = Opcode::Match(vec!["a".into(), "b".into(), "c".into()]);
        assert_eq!(op.stack_arity(), (4, 0));
    }

    #[test]
    fn display_round_trips_the_source_spelling() {
        assert_eq!(Opcode::Bnz("loop".into()).to_string(), "bnz loop");
        assert_eq!(
            Opcode::Txn(TransactionField::GroupIndex).to_string(),
            "txn GroupIndex"
        );
        assert_eq!(Opcode::IntcBlock(vec![1, 2, 3]).to_string(), "intcblock 1 2 3");
        assert_eq!(Opcode::Label("main".into()).to_string(), "main:");
    }
}
